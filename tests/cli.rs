//! E2E tests for the assetbook command line

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn assetbook(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_assetbook"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn assetbook_with_stdin(args: &[&str], input: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_assetbook"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child
        .stdin
        .take()
        .expect("stdin not piped")
        .write_all(input)
        .expect("Failed to write stdin");
    child.wait_with_output().expect("Failed to wait for command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON")
}

/// Test the single asset calculation from the worked example
#[test]
fn calc_two_years_into_five_year_life() {
    let output = assetbook(&[
        "calc",
        "--price",
        "120000",
        "--life",
        "5",
        "--purchased",
        "2022-03-15",
        "--as-of",
        "2024-03-01",
    ]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("2000.00"));
    assert!(stdout.contains("48000.00"));
    assert!(stdout.contains("72000.00"));
}

#[test]
fn calc_json_caps_at_purchase_price() {
    let output = assetbook(&[
        "calc",
        "-p",
        "10000",
        "-l",
        "1",
        "-d",
        "2023-01-01",
        "--as-of",
        "2024-07-01",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let value = json(&output);
    assert_eq!(value["months_elapsed"], 18);
    assert_eq!(value["accumulated_depreciation"], "10000.00");
    assert_eq!(value["current_book_value"], "0.00");
}

#[test]
fn calc_rejects_zero_useful_life() {
    let output = assetbook(&["calc", "-p", "1000", "-l", "0", "-d", "2024-01-01"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("useful life must be greater than zero"));
}

#[test]
fn schedule_csv_has_one_row_per_month() {
    let output = assetbook(&["schedule", "-p", "1200", "-l", "1", "-d", "2024-01-20", "--csv"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines[0], "month,period,charge,accumulated,book_value");
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[1], "1,2024-02,100.00,100.00,1100.00");
    assert_eq!(lines[12], "12,2025-01,100.00,1200.00,0.00");
}

#[test]
fn register_table_excludes_archived() {
    let output = assetbook(&[
        "register",
        "-a",
        "tests/data/register.csv",
        "--as-of",
        "2024-03-01",
    ]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("AV-001"));
    assert!(stdout.contains("72000.00"));
    assert!(stdout.contains("FullyDepreciated"));
    assert!(stdout.contains("InMaintenance"));
    assert!(stdout.contains("FuturePurchaseDate"));
    assert!(!stdout.contains("FU-090"));
}

#[test]
fn register_json_totals() {
    let output = assetbook(&[
        "register",
        "-a",
        "tests/data/register.csv",
        "--as-of",
        "2024-03-01",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let value = json(&output);
    assert_eq!(value["as_of"], "2024-03-01");
    assert_eq!(value["totals"]["asset_count"], 4);
    assert_eq!(value["totals"]["purchase_cost"], "136000.00");
    assert_eq!(value["totals"]["accumulated_depreciation"], "59400.00");
    assert_eq!(value["totals"]["book_value"], "76600.00");
    assert_eq!(value["totals"]["monthly_charge"], "2130.00");
}

#[test]
fn register_filter_by_location_with_archived() {
    let output = assetbook(&[
        "register",
        "-a",
        "tests/data/register.csv",
        "--as-of",
        "2024-03-01",
        "--location",
        "store",
        "--include-archived",
        "--csv",
    ]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("FU-090,Filing cabinet,Furniture,Store,Archived"));
}

#[test]
fn register_json_input_uses_embedded_as_of() {
    let output = assetbook(&["register", "-a", "tests/data/register.json", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let value = json(&output);
    assert_eq!(value["as_of"], "2024-03-01");
    assert_eq!(value["totals"]["book_value"], "73000.00");
}

#[test]
fn register_json_from_stdin() {
    let mut input = b"\n   ".to_vec();
    input.extend(std::fs::read("tests/data/register.json").unwrap());
    let output = assetbook_with_stdin(&["register", "-a", "-", "--json"], &input);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let value = json(&output);
    assert_eq!(value["as_of"], "2024-03-01");
    assert_eq!(value["totals"]["book_value"], "73000.00");
}

#[test]
fn register_csv_from_stdin() {
    let input = std::fs::read("tests/data/register.csv").unwrap();
    let output = assetbook_with_stdin(
        &["register", "-a", "-", "--as-of", "2024-03-01", "--json"],
        &input,
    );
    assert!(output.status.success(), "Command failed: {:?}", output);

    let value = json(&output);
    assert_eq!(value["totals"]["asset_count"], 4);
    assert_eq!(value["totals"]["book_value"], "76600.00");
}

#[test]
fn empty_stdin_fails() {
    let output = assetbook_with_stdin(&["register", "-a", "-"], b"");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No input received"));
}

#[test]
fn summary_by_location() {
    let output = assetbook(&[
        "summary",
        "-a",
        "tests/data/register.csv",
        "--as-of",
        "2024-03-01",
        "--by",
        "location",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let value = json(&output);
    assert_eq!(value["group_by"], "location");
    assert_eq!(value["groups"]["Room 101"]["asset_count"], 2);
    assert_eq!(value["groups"]["Room 101"]["book_value"], "4600.00");
    assert_eq!(value["groups"]["Room 204"]["book_value"], "72000.00");
    assert_eq!(value["totals"]["book_value"], "76600.00");
}

#[test]
fn summary_table_by_category() {
    let output = assetbook(&[
        "summary",
        "-a",
        "tests/data/register.csv",
        "--as-of",
        "2024-03-01",
    ]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("AV Equipment"));
    assert!(stdout.contains("Fixtures"));
    assert!(stdout.contains("TOTAL"));
}

#[test]
fn validate_reports_issues_and_fails() {
    let output = assetbook(&[
        "validate",
        "-a",
        "tests/data/invalid.csv",
        "--as-of",
        "2024-01-01",
        "--json",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let value = json(&output);
    assert_eq!(value["asset_count"], 3);
    assert_eq!(value["issue_count"], 2);
    assert_eq!(value["issues"][0]["type"], "InvalidInput");
    assert_eq!(value["issues"][0]["asset_id"], "BAD-1");
    assert_eq!(value["issues"][1]["type"], "FuturePurchaseDate");
    assert_eq!(value["issues"][1]["asset_id"], "FUT-1");
}

#[test]
fn validate_clean_register_succeeds() {
    let output = assetbook(&["validate", "-a", "tests/data/register.json"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("No issues found"));
}

#[test]
fn schema_csv_header() {
    let output = assetbook(&["schema", "csv-header"]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(
        stdout(&output).trim(),
        "id,name,category,location,status,purchase_price,useful_life_years,purchase_date,serial_number,description"
    );
}

#[test]
fn schema_json_describes_register() {
    let output = assetbook(&["schema"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let value = json(&output);
    assert_eq!(value["title"], "AssetRegister");
}

#[test]
fn html_report_written_to_file() {
    let path = std::env::temp_dir().join(format!("assetbook-test-{}.html", std::process::id()));
    let output = assetbook(&[
        "html",
        "-a",
        "tests/data/register.csv",
        "--as-of",
        "2024-03-01",
        "-o",
        path.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let html = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert!(html.contains("<title>Asset Register</title>"));
    assert!(html.contains("Conference projector"));
}
