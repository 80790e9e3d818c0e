pub mod assets;
pub mod depreciation;
pub mod valuation;
pub mod warnings;

// Flat public surface for domain types and functions.
#[allow(unused_imports)]
pub use assets::{
    read_csv, read_json, records_to_assets, Asset, AssetError, AssetRecord, AssetRegister,
    AssetStatus, CsvField, LoadedRegister,
};
#[allow(unused_imports)]
pub use depreciation::{
    calculate_depreciation, depreciation_schedule, months_elapsed, parse_purchase_date,
    Depreciation, DepreciationError, DepreciationInput, ErrorKind, ScheduleEntry,
};
#[allow(unused_imports)]
pub use valuation::{
    value_asset, value_register, AssetValuation, RegisterFilter, RegisterValuation, Totals,
};
#[allow(unused_imports)]
pub use warnings::Warning;
