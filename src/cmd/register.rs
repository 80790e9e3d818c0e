//! Register command - per-asset book values on the evaluation date

use crate::cmd::read_register;
use crate::core::{
    value_register, AssetValuation, Depreciation, RegisterFilter, RegisterValuation, Totals,
};
use crate::utils::{format_decimal, format_money, resolve_as_of, write_csv};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Register selection flags shared by the register, summary and html commands
#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// CSV or JSON asset register ("-" for stdin)
    #[arg(short, long)]
    pub assets: PathBuf,

    /// Evaluation date (defaults to the register's as_of, then today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Only include assets in this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only include assets in this room or unit
    #[arg(short, long)]
    pub location: Option<String>,

    /// Include archived assets
    #[arg(long)]
    pub include_archived: bool,
}

impl RegisterArgs {
    pub fn filter(&self) -> RegisterFilter {
        RegisterFilter {
            category: self.category.clone(),
            location: self.location.clone(),
            include_archived: self.include_archived,
        }
    }

    pub fn as_of(&self, from_register: Option<NaiveDate>) -> NaiveDate {
        resolve_as_of(self.as_of, from_register)
    }
}

#[derive(Args, Debug)]
pub struct RegisterCommand {
    #[command(flatten)]
    register: RegisterArgs,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

impl RegisterCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let loaded = read_register(&self.register.assets)?;
        let as_of = self.register.as_of(loaded.as_of);
        let valuation = value_register(&loaded.assets, as_of, &self.register.filter());
        let rows: Vec<AssetRow> = valuation.assets.iter().map(AssetRow::from).collect();

        if self.json {
            print_json(&valuation, rows)
        } else if self.csv {
            write_csv(&rows, io::stdout())
        } else {
            print_table(&valuation, &rows);
            Ok(())
        }
    }
}

fn print_table(valuation: &RegisterValuation, rows: &[AssetRow]) {
    if rows.is_empty() {
        println!("No assets found matching filters");
        return;
    }

    println!();
    println!("ASSET REGISTER (as of {})", valuation.as_of);
    println!();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);

    let totals = &valuation.totals;
    println!();
    println!(
        "  {} assets  cost {}  accumulated {}  book value {}  monthly charge {}",
        totals.asset_count,
        format_money(totals.purchase_cost),
        format_money(totals.accumulated_depreciation),
        format_money(totals.book_value),
        format_money(totals.monthly_charge),
    );
    let warning_count = valuation.warnings().count();
    if warning_count > 0 {
        println!("  {} warning(s) - run `assetbook validate` for details", warning_count);
    }
    println!();
}

#[derive(Debug, Serialize)]
struct RegisterOutput {
    as_of: String,
    totals: TotalsOutput,
    assets: Vec<AssetRow>,
}

/// Totals with amounts formatted to two decimal places
#[derive(Debug, Serialize)]
pub struct TotalsOutput {
    pub asset_count: usize,
    pub purchase_cost: String,
    pub accumulated_depreciation: String,
    pub book_value: String,
    pub monthly_charge: String,
}

impl From<&Totals> for TotalsOutput {
    fn from(totals: &Totals) -> Self {
        TotalsOutput {
            asset_count: totals.asset_count,
            purchase_cost: format_money(totals.purchase_cost),
            accumulated_depreciation: format_money(totals.accumulated_depreciation),
            book_value: format_money(totals.book_value),
            monthly_charge: format_money(totals.monthly_charge),
        }
    }
}

fn print_json(valuation: &RegisterValuation, rows: Vec<AssetRow>) -> anyhow::Result<()> {
    let output = RegisterOutput {
        as_of: valuation.as_of.to_string(),
        totals: (&valuation.totals).into(),
        assets: rows,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Row for the register table output
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct AssetRow {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "Name")]
    pub name: String,

    #[tabled(rename = "Category")]
    pub category: String,

    #[tabled(rename = "Location")]
    pub location: String,

    #[tabled(rename = "Status")]
    pub status: String,

    #[tabled(rename = "Purchased")]
    pub purchase_date: String,

    #[tabled(rename = "Cost")]
    pub purchase_price: String,

    #[tabled(rename = "Life (yrs)")]
    pub useful_life_years: String,

    #[tabled(rename = "Months")]
    pub months_elapsed: String,

    #[tabled(rename = "Monthly")]
    pub monthly_depreciation: String,

    #[tabled(rename = "Accumulated")]
    pub accumulated_depreciation: String,

    #[tabled(rename = "Book Value")]
    pub book_value: String,

    #[tabled(rename = "Notes")]
    pub notes: String,
}

impl From<&AssetValuation<'_>> for AssetRow {
    fn from(valuation: &AssetValuation<'_>) -> Self {
        let asset = valuation.asset;
        let depreciation = valuation.depreciation.as_ref();
        AssetRow {
            id: asset.id.clone(),
            name: asset.name.clone(),
            category: asset.category_or_default().to_string(),
            location: asset.location_or_default().to_string(),
            status: asset.status.to_string(),
            purchase_date: asset.purchase_date.to_string(),
            purchase_price: format_money(asset.purchase_price),
            useful_life_years: format_decimal(asset.useful_life_years),
            months_elapsed: depreciation.map_or("-".to_string(), |d| d.months_elapsed.to_string()),
            monthly_depreciation: amount(depreciation, |d| d.monthly_depreciation),
            accumulated_depreciation: amount(depreciation, |d| d.accumulated_depreciation),
            book_value: amount(depreciation, |d| d.current_book_value),
            notes: valuation
                .warnings
                .iter()
                .map(|w| w.name())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

fn amount(depreciation: Option<&Depreciation>, field: impl Fn(&Depreciation) -> Decimal) -> String {
    depreciation.map_or("-".to_string(), |d| format_money(field(d)))
}
