//! Summary command - register totals grouped by category or location

use crate::cmd::read_register;
use crate::cmd::register::{RegisterArgs, TotalsOutput};
use crate::core::{value_register, RegisterValuation, Totals};
use crate::utils::format_money;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    register: RegisterArgs,

    /// Group totals by
    #[arg(short, long, value_enum, default_value_t = GroupBy::Category)]
    by: GroupBy,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum GroupBy {
    #[default]
    Category,
    Location,
}

impl GroupBy {
    fn label(self) -> &'static str {
        match self {
            GroupBy::Category => "Category",
            GroupBy::Location => "Location",
        }
    }

    fn groups<'v>(self, valuation: &'v RegisterValuation) -> &'v BTreeMap<String, Totals> {
        match self {
            GroupBy::Category => &valuation.by_category,
            GroupBy::Location => &valuation.by_location,
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryOutput {
    as_of: String,
    group_by: String,
    groups: BTreeMap<String, TotalsOutput>,
    totals: TotalsOutput,
    warning_count: usize,
}

#[derive(Debug, Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Assets")]
    asset_count: usize,
    #[tabled(rename = "Cost")]
    purchase_cost: String,
    #[tabled(rename = "Accumulated")]
    accumulated_depreciation: String,
    #[tabled(rename = "Book Value")]
    book_value: String,
    #[tabled(rename = "Monthly Charge")]
    monthly_charge: String,
}

impl GroupRow {
    fn new(group: &str, totals: &Totals) -> Self {
        GroupRow {
            group: group.to_string(),
            asset_count: totals.asset_count,
            purchase_cost: format_money(totals.purchase_cost),
            accumulated_depreciation: format_money(totals.accumulated_depreciation),
            book_value: format_money(totals.book_value),
            monthly_charge: format_money(totals.monthly_charge),
        }
    }
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let loaded = read_register(&self.register.assets)?;
        let as_of = self.register.as_of(loaded.as_of);
        let valuation = value_register(&loaded.assets, as_of, &self.register.filter());

        if self.json {
            self.print_json(&valuation)
        } else {
            self.print_summary(&valuation);
            Ok(())
        }
    }

    fn print_summary(&self, valuation: &RegisterValuation) {
        println!();
        println!(
            "ASSET SUMMARY by {} (as of {})",
            self.by.label().to_lowercase(),
            valuation.as_of
        );
        println!();

        let mut rows: Vec<GroupRow> = self
            .by
            .groups(valuation)
            .iter()
            .map(|(group, totals)| GroupRow::new(group, totals))
            .collect();
        rows.push(GroupRow::new("TOTAL", &valuation.totals));

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        let warning_count = valuation.warnings().count();
        if warning_count > 0 {
            println!();
            println!("  {} warning(s) - run `assetbook validate` for details", warning_count);
        }
        println!();
    }

    fn print_json(&self, valuation: &RegisterValuation) -> anyhow::Result<()> {
        let output = SummaryOutput {
            as_of: valuation.as_of.to_string(),
            group_by: self.by.label().to_lowercase(),
            groups: self
                .by
                .groups(valuation)
                .iter()
                .map(|(group, totals)| (group.clone(), totals.into()))
                .collect(),
            totals: (&valuation.totals).into(),
            warning_count: valuation.warnings().count(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
