//! Calc command - depreciation of a single asset

use crate::core::{calculate_depreciation, parse_purchase_date, Depreciation, DepreciationInput};
use crate::utils::{format_decimal, format_money, today};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CalcCommand {
    /// Purchase price
    #[arg(short, long)]
    price: Decimal,

    /// Useful life in years
    #[arg(short, long)]
    life: Decimal,

    /// Purchase date (YYYY-MM-DD or ISO 8601 timestamp)
    #[arg(short = 'd', long)]
    purchased: String,

    /// Evaluation date (defaults to today)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct CalcOutput {
    as_of: String,
    purchase_date: String,
    purchase_price: String,
    useful_life_years: String,
    months_elapsed: i64,
    monthly_depreciation: String,
    accumulated_depreciation: String,
    current_book_value: String,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let purchase_date = parse_purchase_date(&self.purchased)?;
        let input = DepreciationInput::new(self.price, self.life, purchase_date)?;
        let as_of = self.as_of.unwrap_or_else(today);
        let result = calculate_depreciation(&input, as_of)?;

        if self.json {
            let output = CalcOutput {
                as_of: as_of.to_string(),
                purchase_date: purchase_date.to_string(),
                purchase_price: format_money(input.purchase_price()),
                useful_life_years: format_decimal(input.useful_life_years()),
                months_elapsed: result.months_elapsed,
                monthly_depreciation: format_money(result.monthly_depreciation),
                accumulated_depreciation: format_money(result.accumulated_depreciation),
                current_book_value: format_money(result.current_book_value),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&input, &result, as_of);
        }
        Ok(())
    }
}

fn print_text(input: &DepreciationInput, result: &Depreciation, as_of: NaiveDate) {
    println!();
    println!("DEPRECIATION (as of {})", as_of);
    println!();
    println!("  Purchase price:            {:>14}", format_money(input.purchase_price()));
    println!(
        "  Useful life:               {:>14}",
        format!(
            "{} yrs ({} mo)",
            format_decimal(input.useful_life_years()),
            format_decimal(result.total_months)
        )
    );
    println!("  Purchased:                 {:>14}", input.purchase_date().to_string());
    println!("  Months elapsed:            {:>14}", result.months_elapsed);
    println!();
    println!("  Monthly depreciation:      {:>14}", format_money(result.monthly_depreciation));
    println!(
        "  Accumulated depreciation:  {:>14}",
        format_money(result.accumulated_depreciation)
    );
    println!("  Current book value:        {:>14}", format_money(result.current_book_value));
    if result.is_fully_depreciated() {
        println!();
        println!("  Asset is fully depreciated.");
    }
    println!();
}
