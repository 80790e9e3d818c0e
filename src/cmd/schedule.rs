//! Schedule command - month-by-month depreciation until fully written down

use crate::core::{depreciation_schedule, parse_purchase_date, DepreciationInput, ScheduleEntry};
use crate::utils::{format_money, write_csv};
use clap::Args;
use rust_decimal::Decimal;
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ScheduleCommand {
    /// Purchase price
    #[arg(short, long)]
    price: Decimal,

    /// Useful life in years
    #[arg(short, long)]
    life: Decimal,

    /// Purchase date (YYYY-MM-DD or ISO 8601 timestamp)
    #[arg(short = 'd', long)]
    purchased: String,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

impl ScheduleCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let purchase_date = parse_purchase_date(&self.purchased)?;
        let input = DepreciationInput::new(self.price, self.life, purchase_date)?;
        let rows: Vec<ScheduleRow> = depreciation_schedule(&input)?
            .iter()
            .map(ScheduleRow::from)
            .collect();

        if self.csv {
            write_csv(&rows, io::stdout())
        } else {
            let table = Table::new(&rows)
                .with(Style::rounded())
                .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Tabled, serde::Serialize)]
pub struct ScheduleRow {
    #[tabled(rename = "Month")]
    pub month: u32,

    #[tabled(rename = "Period")]
    pub period: String,

    #[tabled(rename = "Charge")]
    pub charge: String,

    #[tabled(rename = "Accumulated")]
    pub accumulated: String,

    #[tabled(rename = "Book Value")]
    pub book_value: String,
}

impl From<&ScheduleEntry> for ScheduleRow {
    fn from(entry: &ScheduleEntry) -> Self {
        ScheduleRow {
            month: entry.month,
            period: entry.period.clone(),
            charge: format_money(entry.charge),
            accumulated: format_money(entry.accumulated_depreciation),
            book_value: format_money(entry.book_value),
        }
    }
}
