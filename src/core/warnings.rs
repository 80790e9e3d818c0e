use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Issues found while valuing a register. None of them stop the valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// The asset's price, useful life or date cannot be depreciated.
    /// The asset is left out of all totals.
    InvalidDepreciationInput { reason: String },
    /// Purchase date is after the evaluation date; carried at full cost.
    FuturePurchaseDate,
    /// Book value has reached zero.
    FullyDepreciated,
    /// Asset is currently out for maintenance.
    InMaintenance,
    /// Adding the asset would overflow the register totals, so it is left out of them.
    TotalsOverflow,
}

impl Warning {
    pub fn name(&self) -> &'static str {
        match self {
            Warning::InvalidDepreciationInput { .. } => "InvalidInput",
            Warning::FuturePurchaseDate => "FuturePurchaseDate",
            Warning::FullyDepreciated => "FullyDepreciated",
            Warning::InMaintenance => "InMaintenance",
            Warning::TotalsOverflow => "TotalsOverflow",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Warning::InvalidDepreciationInput { reason } => {
                format!("Cannot depreciate: {reason}")
            }
            Warning::FuturePurchaseDate => {
                "Purchase date is after the evaluation date - carried at full cost".to_string()
            }
            Warning::FullyDepreciated => "Asset is fully depreciated".to_string(),
            Warning::InMaintenance => "Asset is under maintenance".to_string(),
            Warning::TotalsOverflow => {
                "Amounts too large to add to the register totals".to_string()
            }
        }
    }

    /// Whether the warning points at bad data rather than a normal lifecycle state.
    pub fn is_data_issue(&self) -> bool {
        matches!(
            self,
            Warning::InvalidDepreciationInput { .. }
                | Warning::FuturePurchaseDate
                | Warning::TotalsOverflow
        )
    }
}
