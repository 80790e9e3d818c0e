use chrono::{Local, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

pub fn write_csv<I, R, W>(records: I, writer: W) -> anyhow::Result<()>
where
    I: IntoIterator<Item = R>,
    R: serde::Serialize,
    W: std::io::Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records.into_iter() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Amount rounded half away from zero to two decimal places
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Decimal without trailing zeros, e.g. `5.00` -> `5`, `2.50` -> `2.5`
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Evaluation date: explicit flag, then the date carried by the input, then today
pub fn resolve_as_of(flag: Option<NaiveDate>, from_input: Option<NaiveDate>) -> NaiveDate {
    flag.or(from_input).unwrap_or_else(today)
}
