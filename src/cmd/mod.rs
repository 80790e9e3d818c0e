pub mod calc;
pub mod html_report;
pub mod register;
pub mod schedule;
pub mod schema;
pub mod serve;
pub mod summary;
pub mod validate;

use crate::core::{self, LoadedRegister};
use anyhow::Context;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read an asset register from CSV or JSON (or stdin with "-")
pub fn read_register(path: &Path) -> anyhow::Result<LoadedRegister> {
    if path.as_os_str() == "-" {
        return read_from_stdin();
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open register {}", path.display()))?;
    let reader = BufReader::new(file);
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        core::read_json(reader)
    } else {
        core::read_csv(reader)
    }
}

fn read_from_stdin() -> anyhow::Result<LoadedRegister> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    let looks_like_json = buffer
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{');
    let cursor = io::Cursor::new(buffer);
    if looks_like_json {
        core::read_json(cursor)
    } else {
        core::read_csv(cursor)
    }
}
