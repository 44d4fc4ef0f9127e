//! Budget period classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode};

/// The reporting period a budget covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetPeriod {
    Monthly,
    Quarterly,
    Yearly,
    Custom,
}

impl BudgetPeriod {
    /// Parses a period from its wire representation.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.to_uppercase().as_str() {
            "MONTHLY" => Ok(BudgetPeriod::Monthly),
            "QUARTERLY" => Ok(BudgetPeriod::Quarterly),
            "YEARLY" => Ok(BudgetPeriod::Yearly),
            "CUSTOM" => Ok(BudgetPeriod::Custom),
            _ => Err(DomainError::new(
                ErrorCode::InvalidEnumValue,
                format!("Unknown budget period: {}", value),
            )),
        }
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Monthly => "MONTHLY",
            BudgetPeriod::Quarterly => "QUARTERLY",
            BudgetPeriod::Yearly => "YEARLY",
            BudgetPeriod::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
