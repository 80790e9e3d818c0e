use super::depreciation::{parse_purchase_date, DepreciationError, DepreciationInput};
use assetbook_derive::CsvSchema;
use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset id is required (record {0})")]
    MissingId(usize),
    #[error("asset name is required: {0}")]
    MissingName(String),
    #[error("unknown asset status '{status}': {id}")]
    UnknownStatus { id: String, status: String },
    #[error("invalid purchase date '{date}': {id}")]
    InvalidDate { id: String, date: String },
    #[error("duplicate asset id: {0}")]
    DuplicateId(String),
}

/// Column metadata generated by `#[derive(CsvSchema)]`
#[derive(Debug, Clone, Copy)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Lifecycle state of an asset in the register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssetStatus {
    #[default]
    Active,
    InMaintenance,
    Archived,
}

impl FromStr for AssetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "" | "active" => Ok(AssetStatus::Active),
            "inmaintenance" | "in_maintenance" | "maintenance" => Ok(AssetStatus::InMaintenance),
            "archived" => Ok(AssetStatus::Archived),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetStatus::Active => "Active",
            AssetStatus::InMaintenance => "InMaintenance",
            AssetStatus::Archived => "Archived",
        };
        f.write_str(s)
    }
}

/// Register JSON input format
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetRegister {
    /// Evaluation date for the register (defaults to today)
    #[serde(default)]
    pub as_of: Option<String>,
    pub assets: Vec<AssetRecord>,
}

/// One asset row, as exported from the asset tracking system
#[derive(Debug, Clone, Serialize, Deserialize, CsvSchema, JsonSchema)]
pub struct AssetRecord {
    /// Unique asset tag or inventory number
    pub id: String,
    /// Display name of the asset
    pub name: String,
    /// Asset category (e.g., Furniture, IT Equipment)
    #[serde(default)]
    pub category: Option<String>,
    /// Room or unit holding the asset
    #[serde(default)]
    pub location: Option<String>,
    /// Active, InMaintenance or Archived (default Active)
    #[serde(default)]
    pub status: Option<String>,
    /// Purchase price
    #[serde(deserialize_with = "deserialize_amount")]
    #[schemars(with = "f64")]
    pub purchase_price: Decimal,
    /// Useful life in years
    #[serde(deserialize_with = "deserialize_amount")]
    #[schemars(with = "f64")]
    pub useful_life_years: Decimal,
    /// Purchase date (YYYY-MM-DD or ISO 8601 timestamp)
    pub purchase_date: String,
    /// Manufacturer serial number
    #[serde(default)]
    pub serial_number: Option<String>,
    /// Free text description
    #[serde(default)]
    pub description: Option<String>,
}

/// Amounts arrive as JSON numbers, CSV fields of any integer width, or numeric strings.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl Visitor<'_> for AmountVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal amount")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(value))
        }

        fn visit_i128<E: de::Error>(self, value: i128) -> Result<Decimal, E> {
            Decimal::from_i128(value)
                .ok_or_else(|| E::custom(format!("amount out of range: {value}")))
        }

        fn visit_u128<E: de::Error>(self, value: u128) -> Result<Decimal, E> {
            Decimal::from_u128(value)
                .ok_or_else(|| E::custom(format!("amount out of range: {value}")))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
            Decimal::from_f64(value)
                .ok_or_else(|| E::custom(format!("amount out of range: {value}")))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
            let value = value.trim();
            Decimal::from_str(value)
                .or_else(|_| Decimal::from_scientific(value))
                .map_err(|e| E::custom(format!("invalid amount '{value}': {e}")))
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

/// A validated register asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub location: Option<String>,
    pub status: AssetStatus,
    pub purchase_price: Decimal,
    pub useful_life_years: Decimal,
    pub purchase_date: NaiveDate,
    pub serial_number: Option<String>,
    pub description: Option<String>,
}

impl Asset {
    /// Price and useful life are only checked here, so a register with one bad row still loads.
    pub fn depreciation_input(&self) -> Result<DepreciationInput, DepreciationError> {
        DepreciationInput::new(
            self.purchase_price,
            self.useful_life_years,
            self.purchase_date,
        )
    }

    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or("Uncategorised")
    }

    pub fn location_or_default(&self) -> &str {
        self.location.as_deref().unwrap_or("Unassigned")
    }
}

impl TryFrom<AssetRecord> for Asset {
    type Error = AssetError;

    fn try_from(record: AssetRecord) -> Result<Self, Self::Error> {
        let id = record.id.trim().to_string();
        let name = record.name.trim().to_string();
        if name.is_empty() {
            return Err(AssetError::MissingName(id));
        }
        let status = match record.status.as_deref() {
            Some(s) => s.parse().map_err(|status| AssetError::UnknownStatus {
                id: id.clone(),
                status,
            })?,
            None => AssetStatus::default(),
        };
        let purchase_date =
            parse_purchase_date(&record.purchase_date).map_err(|_| AssetError::InvalidDate {
                id: id.clone(),
                date: record.purchase_date.clone(),
            })?;

        Ok(Asset {
            id,
            name,
            category: non_empty(record.category),
            location: non_empty(record.location),
            status,
            purchase_price: record.purchase_price,
            useful_life_years: record.useful_life_years,
            purchase_date,
            serial_number: non_empty(record.serial_number),
            description: non_empty(record.description),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Validate records, reject duplicate ids and order by purchase date
pub fn records_to_assets(records: Vec<AssetRecord>) -> Result<Vec<Asset>, AssetError> {
    let mut seen = HashSet::new();
    let mut assets = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        if record.id.trim().is_empty() {
            return Err(AssetError::MissingId(index + 1));
        }
        let asset = Asset::try_from(record)?;
        if !seen.insert(asset.id.clone()) {
            return Err(AssetError::DuplicateId(asset.id));
        }
        assets.push(asset);
    }
    assets.sort_by(|a, b| {
        a.purchase_date
            .cmp(&b.purchase_date)
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(assets)
}

/// Assets parsed from a register file, with the evaluation date it carries (JSON only)
#[derive(Debug, Clone)]
pub struct LoadedRegister {
    pub assets: Vec<Asset>,
    pub as_of: Option<NaiveDate>,
}

/// Read a register from CSV
pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<LoadedRegister> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let records: Result<Vec<AssetRecord>, _> = rdr.deserialize::<AssetRecord>().collect();
    let assets = records_to_assets(records?)?;
    log::info!("Read {} assets from csv", assets.len());
    Ok(LoadedRegister { assets, as_of: None })
}

/// Read a register from JSON
pub fn read_json<R: Read>(reader: R) -> anyhow::Result<LoadedRegister> {
    let input: AssetRegister = serde_json::from_reader(reader)?;
    let as_of = input
        .as_of
        .as_deref()
        .map(parse_purchase_date)
        .transpose()
        .map_err(|e| anyhow::anyhow!("invalid register as_of: {e}"))?;
    let assets = records_to_assets(input.assets)?;
    log::info!("Read {} assets from json", assets.len());
    Ok(LoadedRegister { assets, as_of })
}
