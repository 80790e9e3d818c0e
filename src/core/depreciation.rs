use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Longest schedule we are willing to lay out month by month (100 years).
pub const MAX_SCHEDULE_MONTHS: u32 = 1200;

/// Broad classification of a [`DepreciationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied missing or invalid values. Fix the input and retry.
    InvalidInput,
    /// The computation itself failed on otherwise valid input.
    Internal,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DepreciationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: String },
    #[error("{field} is outside the supported range, got {value}")]
    OutOfRange { field: &'static str, value: String },
    #[error("purchase price must not be negative: {0}")]
    NegativePrice(Decimal),
    #[error("useful life must be greater than zero years: {0}")]
    NonPositiveUsefulLife(Decimal),
    #[error("invalid purchase date: {0}")]
    InvalidDate(String),
    #[error("schedule of {months} months exceeds the limit of {max}")]
    ScheduleTooLong { months: Decimal, max: u32 },
    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

impl DepreciationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DepreciationError::Overflow(_) => ErrorKind::Internal,
            _ => ErrorKind::InvalidInput,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}

/// Validated inputs for a straight-line depreciation calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepreciationInput {
    purchase_price: Decimal,
    useful_life_years: Decimal,
    purchase_date: NaiveDate,
}

impl DepreciationInput {
    pub fn new(
        purchase_price: Decimal,
        useful_life_years: Decimal,
        purchase_date: NaiveDate,
    ) -> Result<Self, DepreciationError> {
        if purchase_price < Decimal::ZERO {
            return Err(DepreciationError::NegativePrice(purchase_price));
        }
        if useful_life_years <= Decimal::ZERO {
            return Err(DepreciationError::NonPositiveUsefulLife(useful_life_years));
        }
        Ok(Self {
            purchase_price,
            useful_life_years,
            purchase_date,
        })
    }

    /// Build from loosely typed values, e.g. numbers decoded from a JSON request.
    pub fn from_f64(
        purchase_price: f64,
        useful_life_years: f64,
        purchase_date: &str,
    ) -> Result<Self, DepreciationError> {
        let price = decimal_from_f64("purchasePrice", purchase_price)?;
        let life = decimal_from_f64("usefulLifeYears", useful_life_years)?;
        let date = parse_purchase_date(purchase_date)?;
        Self::new(price, life, date)
    }

    pub fn purchase_price(&self) -> Decimal {
        self.purchase_price
    }

    pub fn useful_life_years(&self) -> Decimal {
        self.useful_life_years
    }

    pub fn purchase_date(&self) -> NaiveDate {
        self.purchase_date
    }

    /// Useful life expressed in months. Fractional for fractional years.
    pub fn total_months(&self) -> Result<Decimal, DepreciationError> {
        self.useful_life_years
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or(DepreciationError::Overflow("total months"))
    }

    pub fn monthly_depreciation(&self) -> Result<Decimal, DepreciationError> {
        self.purchase_price
            .checked_div(self.total_months()?)
            .ok_or(DepreciationError::Overflow("monthly depreciation"))
    }

    /// Depreciation state once `months` whole months have elapsed since purchase.
    fn after_months(&self, months: i64) -> Result<Depreciation, DepreciationError> {
        let total_months = self.total_months()?;
        let monthly = self.monthly_depreciation()?;
        let months = months.max(0);
        let elapsed = Decimal::from(months);

        let accumulated = if elapsed >= total_months {
            self.purchase_price
        } else {
            monthly
                .checked_mul(elapsed)
                .ok_or(DepreciationError::Overflow("accumulated depreciation"))?
                .min(self.purchase_price)
        };
        let book_value = (self.purchase_price - accumulated).max(Decimal::ZERO);

        Ok(Depreciation {
            monthly_depreciation: monthly,
            accumulated_depreciation: accumulated,
            current_book_value: book_value,
            months_elapsed: months,
            total_months,
        })
    }
}

/// Result of evaluating an asset's depreciation on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Depreciation {
    pub monthly_depreciation: Decimal,
    pub accumulated_depreciation: Decimal,
    pub current_book_value: Decimal,
    /// Whole months since purchase, clamped at zero.
    pub months_elapsed: i64,
    pub total_months: Decimal,
}

impl Depreciation {
    pub fn is_fully_depreciated(&self) -> bool {
        self.current_book_value.is_zero()
    }
}

/// One month of a depreciation schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    /// Months since purchase at the end of this period (1-based)
    pub month: u32,
    /// Calendar month of the period as `YYYY-MM`
    pub period: String,
    pub charge: Decimal,
    pub accumulated_depreciation: Decimal,
    pub book_value: Decimal,
}

/// Whole months between two dates by calendar field, ignoring the day of month.
///
/// Negative when `as_of` falls in an earlier month than `purchase`.
pub fn months_elapsed(purchase: NaiveDate, as_of: NaiveDate) -> i64 {
    let years = i64::from(as_of.year()) - i64::from(purchase.year());
    let months = i64::from(as_of.month()) - i64::from(purchase.month());
    years * 12 + months
}

/// Straight-line depreciation of `input` evaluated on `as_of`.
pub fn calculate_depreciation(
    input: &DepreciationInput,
    as_of: NaiveDate,
) -> Result<Depreciation, DepreciationError> {
    let months = months_elapsed(input.purchase_date, as_of);
    let result = input.after_months(months)?;
    log::debug!(
        "depreciation purchased={} as_of={} months={} monthly={} book_value={}",
        input.purchase_date,
        as_of,
        months,
        result.monthly_depreciation,
        result.current_book_value
    );
    Ok(result)
}

/// Month-by-month schedule from purchase until the asset is fully depreciated.
pub fn depreciation_schedule(
    input: &DepreciationInput,
) -> Result<Vec<ScheduleEntry>, DepreciationError> {
    let total_months = input.total_months()?;
    let months = total_months
        .ceil()
        .to_u32()
        .filter(|m| *m <= MAX_SCHEDULE_MONTHS)
        .ok_or(DepreciationError::ScheduleTooLong {
            months: total_months,
            max: MAX_SCHEDULE_MONTHS,
        })?;

    let first_of_month = input
        .purchase_date
        .with_day(1)
        .ok_or(DepreciationError::Overflow("schedule start"))?;

    let mut entries = Vec::with_capacity(months as usize);
    let mut previous = input.purchase_price;
    for month in 1..=months {
        let state = input.after_months(i64::from(month))?;
        let period = first_of_month
            .checked_add_months(Months::new(month))
            .ok_or(DepreciationError::Overflow("schedule period"))?;
        entries.push(ScheduleEntry {
            month,
            period: period.format("%Y-%m").to_string(),
            charge: previous - state.current_book_value,
            accumulated_depreciation: state.accumulated_depreciation,
            book_value: state.current_book_value,
        });
        previous = state.current_book_value;
    }
    Ok(entries)
}

/// Parse a purchase date given as a date, a naive datetime or an RFC 3339 timestamp.
pub fn parse_purchase_date(s: &str) -> Result<NaiveDate, DepreciationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DepreciationError::MissingField("purchaseDate"));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.date());
        }
    }
    Err(DepreciationError::InvalidDate(s.to_string()))
}

fn decimal_from_f64(field: &'static str, value: f64) -> Result<Decimal, DepreciationError> {
    if !value.is_finite() {
        return Err(DepreciationError::NotFinite {
            field,
            value: value.to_string(),
        });
    }
    let out_of_range = || DepreciationError::OutOfRange {
        field,
        value: value.to_string(),
    };
    let decimal = Decimal::from_f64(value).ok_or_else(out_of_range)?;
    // too small to represent, would otherwise read as zero
    if decimal.is_zero() && value != 0.0 {
        return Err(out_of_range());
    }
    Ok(decimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn input(price: Decimal, life: Decimal, purchased: &str) -> DepreciationInput {
        DepreciationInput::new(price, life, date(purchased)).unwrap()
    }

    #[test]
    fn five_year_asset_after_two_years() {
        let asset = input(dec!(120000), dec!(5), "2022-03-15");
        let result = calculate_depreciation(&asset, date("2024-03-01")).unwrap();

        assert_eq!(result.monthly_depreciation, dec!(2000));
        assert_eq!(result.accumulated_depreciation, dec!(48000));
        assert_eq!(result.current_book_value, dec!(72000));
        assert_eq!(result.months_elapsed, 24);
        assert_eq!(result.total_months, dec!(60));
    }

    #[test]
    fn accumulated_depreciation_capped_at_price() {
        let asset = input(dec!(10000), dec!(1), "2023-01-10");
        let result = calculate_depreciation(&asset, date("2024-07-10")).unwrap();

        assert_eq!(result.months_elapsed, 18);
        assert_eq!(result.accumulated_depreciation, dec!(10000));
        assert_eq!(result.current_book_value, Decimal::ZERO);
        assert!(result.is_fully_depreciated());
    }

    #[test]
    fn book_value_zero_exactly_at_end_of_life() {
        // 10000 / 12 does not divide evenly
        let asset = input(dec!(10000), dec!(1), "2023-01-10");
        let result = calculate_depreciation(&asset, date("2024-01-10")).unwrap();

        assert_eq!(result.months_elapsed, 12);
        assert_eq!(result.accumulated_depreciation, dec!(10000));
        assert_eq!(result.current_book_value, Decimal::ZERO);
    }

    #[test]
    fn same_month_keeps_full_value() {
        let asset = input(dec!(5000), dec!(3), "2024-05-02");
        let result = calculate_depreciation(&asset, date("2024-05-31")).unwrap();

        assert_eq!(result.months_elapsed, 0);
        assert_eq!(result.current_book_value, dec!(5000));
    }

    #[test]
    fn future_purchase_clamped_to_zero_months() {
        let asset = input(dec!(5000), dec!(3), "2025-01-01");
        let result = calculate_depreciation(&asset, date("2024-06-15")).unwrap();

        assert_eq!(result.months_elapsed, 0);
        assert_eq!(result.accumulated_depreciation, Decimal::ZERO);
        assert_eq!(result.current_book_value, dec!(5000));
    }

    #[test]
    fn day_of_month_is_ignored() {
        assert_eq!(months_elapsed(date("2024-01-31"), date("2024-02-01")), 1);
        assert_eq!(months_elapsed(date("2024-02-01"), date("2024-02-29")), 0);
        assert_eq!(months_elapsed(date("2023-12-31"), date("2024-01-01")), 1);
        assert_eq!(months_elapsed(date("2024-03-01"), date("2024-01-31")), -2);
    }

    #[test]
    fn book_value_stays_within_bounds() {
        let asset = input(dec!(999.99), dec!(2.5), "2020-06-30");
        let mut as_of = date("2020-01-01");
        while as_of < date("2024-01-01") {
            let result = calculate_depreciation(&asset, as_of).unwrap();
            assert!(result.current_book_value >= Decimal::ZERO);
            assert!(result.current_book_value <= dec!(999.99));
            as_of = as_of.checked_add_months(Months::new(1)).unwrap();
        }
    }

    #[test]
    fn monthly_depreciation_is_price_over_months() {
        let asset = input(dec!(3600), dec!(2.5), "2024-01-01");
        assert_eq!(asset.monthly_depreciation().unwrap(), dec!(120));
    }

    #[test]
    fn zero_price_is_allowed() {
        let asset = input(Decimal::ZERO, dec!(4), "2020-01-01");
        let result = calculate_depreciation(&asset, date("2024-01-01")).unwrap();
        assert_eq!(result.current_book_value, Decimal::ZERO);
        assert_eq!(result.monthly_depreciation, Decimal::ZERO);
    }

    #[test]
    fn zero_useful_life_rejected() {
        let err = DepreciationInput::new(dec!(1000), Decimal::ZERO, date("2024-01-01")).unwrap_err();
        assert_eq!(err, DepreciationError::NonPositiveUsefulLife(Decimal::ZERO));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn negative_price_rejected() {
        let err = DepreciationInput::new(dec!(-1), dec!(5), date("2024-01-01")).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn non_finite_numbers_rejected() {
        let err = DepreciationInput::from_f64(f64::NAN, 5.0, "2024-01-01").unwrap_err();
        assert!(matches!(
            err,
            DepreciationError::NotFinite {
                field: "purchasePrice",
                ..
            }
        ));

        let err = DepreciationInput::from_f64(100.0, f64::INFINITY, "2024-01-01").unwrap_err();
        assert!(matches!(
            err,
            DepreciationError::NotFinite {
                field: "usefulLifeYears",
                ..
            }
        ));
    }

    #[test]
    fn unrepresentable_numbers_out_of_range() {
        let err = DepreciationInput::from_f64(1e30, 5.0, "2024-01-01").unwrap_err();
        assert_eq!(
            err,
            DepreciationError::OutOfRange {
                field: "purchasePrice",
                value: 1e30_f64.to_string(),
            }
        );
        assert!(err.is_invalid_input());

        let err = DepreciationInput::from_f64(100.0, 1e-30, "2024-01-01").unwrap_err();
        assert!(matches!(
            err,
            DepreciationError::OutOfRange {
                field: "usefulLifeYears",
                ..
            }
        ));

        let err = DepreciationInput::from_f64(100.0, 0.0, "2024-01-01").unwrap_err();
        assert_eq!(err, DepreciationError::NonPositiveUsefulLife(Decimal::ZERO));
    }

    #[test]
    fn from_f64_builds_valid_input() {
        let asset = DepreciationInput::from_f64(120000.0, 5.0, "2022-03-15").unwrap();
        assert_eq!(asset.purchase_price(), dec!(120000));
        assert_eq!(asset.useful_life_years(), dec!(5));
        assert_eq!(asset.purchase_date(), date("2022-03-15"));
    }

    #[test]
    fn parses_supported_date_formats() {
        let expected = date("2024-01-15");
        for s in [
            "2024-01-15",
            "2024-01-15T10:30:00",
            "2024-01-15T10:30:00.123",
            "2024-01-15 10:30:00",
            "2024-01-15T10:30:00Z",
            "2024-01-15T10:30:00.000+02:00",
        ] {
            assert_eq!(parse_purchase_date(s).unwrap(), expected, "{s}");
        }
    }

    #[test]
    fn unparseable_or_missing_date_rejected() {
        assert_eq!(
            parse_purchase_date("15/01/2024"),
            Err(DepreciationError::InvalidDate("15/01/2024".to_string()))
        );
        assert_eq!(
            parse_purchase_date("  "),
            Err(DepreciationError::MissingField("purchaseDate"))
        );
    }

    #[test]
    fn overflow_reported_as_internal() {
        let asset = input(Decimal::MAX, Decimal::MAX, "2024-01-01");
        let err = calculate_depreciation(&asset, date("2024-02-01")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn schedule_runs_to_zero() {
        let asset = input(dec!(1200), dec!(1), "2024-01-20");
        let schedule = depreciation_schedule(&asset).unwrap();

        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule[0].period, "2024-02");
        assert_eq!(schedule[0].charge, dec!(100));
        assert_eq!(schedule[0].book_value, dec!(1100));
        assert_eq!(schedule[11].period, "2025-01");
        assert_eq!(schedule[11].book_value, Decimal::ZERO);
        assert_eq!(schedule[11].accumulated_depreciation, dec!(1200));

        let total: Decimal = schedule.iter().map(|e| e.charge).sum();
        assert_eq!(total, dec!(1200));
    }

    #[test]
    fn schedule_with_fractional_final_month() {
        // 1.3 years = 15.6 months
        let asset = input(dec!(1560), dec!(1.3), "2024-01-01");
        let schedule = depreciation_schedule(&asset).unwrap();

        assert_eq!(schedule.len(), 16);
        assert_eq!(schedule[0].charge, dec!(100));
        assert_eq!(schedule[15].charge, dec!(60));
        assert_eq!(schedule[15].book_value, Decimal::ZERO);
    }

    #[test]
    fn schedule_too_long_rejected() {
        let asset = input(dec!(100), dec!(500), "2024-01-01");
        let err = depreciation_schedule(&asset).unwrap_err();
        assert!(matches!(err, DepreciationError::ScheduleTooLong { .. }));
    }
}
