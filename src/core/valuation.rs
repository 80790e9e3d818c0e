use super::assets::{Asset, AssetStatus};
use super::depreciation::{calculate_depreciation, months_elapsed, Depreciation};
use super::warnings::Warning;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Which register assets take part in a valuation
#[derive(Debug, Clone, Default)]
pub struct RegisterFilter {
    pub category: Option<String>,
    pub location: Option<String>,
    pub include_archived: bool,
}

impl RegisterFilter {
    pub fn matches(&self, asset: &Asset) -> bool {
        if asset.status == AssetStatus::Archived && !self.include_archived {
            return false;
        }
        let matches_field = |filter: &Option<String>, value: &str| {
            filter
                .as_deref()
                .is_none_or(|f| f.eq_ignore_ascii_case(value))
        };
        matches_field(&self.category, asset.category_or_default())
            && matches_field(&self.location, asset.location_or_default())
    }
}

/// Aggregated figures for a group of assets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub asset_count: usize,
    pub purchase_cost: Decimal,
    pub accumulated_depreciation: Decimal,
    pub book_value: Decimal,
    /// Depreciation charged per month for assets still being depreciated
    pub monthly_charge: Decimal,
}

impl Totals {
    /// Totals with one more asset added, or None if any figure would overflow
    fn with(&self, asset: &Asset, depreciation: &Depreciation) -> Option<Totals> {
        let monthly_charge = if depreciation.is_fully_depreciated() {
            self.monthly_charge
        } else {
            self.monthly_charge
                .checked_add(depreciation.monthly_depreciation)?
        };
        Some(Totals {
            asset_count: self.asset_count + 1,
            purchase_cost: self.purchase_cost.checked_add(asset.purchase_price)?,
            accumulated_depreciation: self
                .accumulated_depreciation
                .checked_add(depreciation.accumulated_depreciation)?,
            book_value: self
                .book_value
                .checked_add(depreciation.current_book_value)?,
            monthly_charge,
        })
    }
}

/// Valuation of a single asset on the evaluation date
#[derive(Debug, Clone)]
pub struct AssetValuation<'a> {
    pub asset: &'a Asset,
    /// None when the asset's inputs cannot be depreciated
    pub depreciation: Option<Depreciation>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone)]
pub struct RegisterValuation<'a> {
    pub as_of: NaiveDate,
    pub assets: Vec<AssetValuation<'a>>,
    pub totals: Totals,
    pub by_category: BTreeMap<String, Totals>,
    pub by_location: BTreeMap<String, Totals>,
}

impl<'a> RegisterValuation<'a> {
    /// All warnings with the asset they belong to, in register order
    pub fn warnings(&self) -> impl Iterator<Item = (&'a Asset, &Warning)> + '_ {
        self.assets
            .iter()
            .flat_map(|v| v.warnings.iter().map(move |w| (v.asset, w)))
    }
}

/// Value every matching asset in the register as of `as_of`
pub fn value_register<'a>(
    assets: &'a [Asset],
    as_of: NaiveDate,
    filter: &RegisterFilter,
) -> RegisterValuation<'a> {
    let mut valuation = RegisterValuation {
        as_of,
        assets: Vec::new(),
        totals: Totals::default(),
        by_category: BTreeMap::new(),
        by_location: BTreeMap::new(),
    };

    for asset in assets.iter().filter(|a| filter.matches(a)) {
        let mut asset_valuation = value_asset(asset, as_of);
        if let Some(ref depreciation) = asset_valuation.depreciation {
            let category = asset.category_or_default();
            let location = asset.location_or_default();
            let group = |groups: &BTreeMap<String, Totals>, key: &str| {
                groups
                    .get(key)
                    .copied()
                    .unwrap_or_default()
                    .with(asset, depreciation)
            };
            // all or nothing, so the groups always add up to the totals
            match (
                valuation.totals.with(asset, depreciation),
                group(&valuation.by_category, category),
                group(&valuation.by_location, location),
            ) {
                (Some(totals), Some(by_category), Some(by_location)) => {
                    valuation.totals = totals;
                    valuation.by_category.insert(category.to_string(), by_category);
                    valuation.by_location.insert(location.to_string(), by_location);
                }
                _ => {
                    log::warn!("Asset {} overflows the register totals", asset.id);
                    asset_valuation.warnings.push(Warning::TotalsOverflow);
                }
            }
        }
        valuation.assets.push(asset_valuation);
    }

    log::debug!(
        "Valued {} assets as of {}: book value {}",
        valuation.totals.asset_count,
        as_of,
        valuation.totals.book_value
    );
    valuation
}

/// Value a single asset, collecting any warnings instead of failing
pub fn value_asset(asset: &Asset, as_of: NaiveDate) -> AssetValuation<'_> {
    let mut warnings = Vec::new();
    if asset.status == AssetStatus::InMaintenance {
        warnings.push(Warning::InMaintenance);
    }

    let depreciation = asset
        .depreciation_input()
        .and_then(|input| calculate_depreciation(&input, as_of));

    let depreciation = match depreciation {
        Ok(depreciation) => {
            if months_elapsed(asset.purchase_date, as_of) < 0 {
                warnings.push(Warning::FuturePurchaseDate);
            }
            if depreciation.is_fully_depreciated() && !asset.purchase_price.is_zero() {
                warnings.push(Warning::FullyDepreciated);
            }
            Some(depreciation)
        }
        Err(e) => {
            log::warn!("Asset {} cannot be depreciated: {}", asset.id, e);
            warnings.push(Warning::InvalidDepreciationInput {
                reason: e.to_string(),
            });
            None
        }
    };

    AssetValuation {
        asset,
        depreciation,
        warnings,
    }
}
