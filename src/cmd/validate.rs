//! Validate command - surface register data quality issues without generating reports

use crate::cmd::read_register;
use crate::core::{value_register, RegisterFilter};
use crate::utils::resolve_as_of;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// CSV or JSON asset register ("-" for stdin)
    #[arg(short, long)]
    assets: PathBuf,

    /// Evaluation date (defaults to the register's as_of, then today)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Also report lifecycle notices (fully depreciated, in maintenance)
    #[arg(long)]
    all: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    asset_id: String,
    asset_name: String,
    purchase_date: String,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    as_of: String,
    asset_count: usize,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let loaded = read_register(&self.assets)?;
        let as_of = resolve_as_of(self.as_of, loaded.as_of);
        let filter = RegisterFilter {
            include_archived: true,
            ..Default::default()
        };
        let valuation = value_register(&loaded.assets, as_of, &filter);

        let issues: Vec<ValidationIssue> = valuation
            .warnings()
            .filter(|(_, w)| self.all || w.is_data_issue())
            .map(|(asset, w)| ValidationIssue {
                issue_type: w.name().to_string(),
                asset_id: asset.id.clone(),
                asset_name: asset.name.clone(),
                purchase_date: asset.purchase_date.format("%Y-%m-%d").to_string(),
                message: w.message(),
            })
            .collect();

        if self.json {
            let output = ValidationOutput {
                as_of: as_of.to_string(),
                asset_count: loaded.assets.len(),
                issue_count: issues.len(),
                issues: issues.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&issues, as_of, loaded.assets.len());
        }

        // Exit with code 1 if data issues found
        let has_data_issues = valuation.warnings().any(|(_, w)| w.is_data_issue());
        if has_data_issues {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(issues: &[ValidationIssue], as_of: NaiveDate, asset_count: usize) {
    println!();
    println!("VALIDATION RESULTS ({} assets, as of {})", asset_count, as_of);
    println!();

    if issues.is_empty() {
        println!("\u{2713} No issues found.");
        return;
    }

    println!("\u{26A0} {} issue(s) found:", issues.len());
    println!();
    for (i, issue) in issues.iter().enumerate() {
        println!(
            "  {}. [{}] {} {} (purchased {})",
            i + 1,
            issue.issue_type,
            issue.asset_id,
            issue.asset_name,
            issue.purchase_date
        );
        println!("     {}", issue.message);
        println!();
    }
}
