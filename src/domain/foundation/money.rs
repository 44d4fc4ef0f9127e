//! Money value object backed by exact decimal arithmetic.
//!
//! Monetary amounts are never represented as floats. Rounding to cents
//! uses the half-up strategy to match accounting conventions.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A non-negative monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a Money value, returning error if negative.
    pub fn try_new(amount: Decimal) -> Result<Self, ValidationError> {
        if amount < Decimal::ZERO {
            return Err(ValidationError::out_of_range(
                "amount",
                "0",
                "unbounded",
                amount,
            ));
        }
        Ok(Self(amount))
    }

    /// Returns the inner decimal amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Rounds to two decimal places, midpoints away from zero (half-up
    /// for the non-negative amounts this type holds).
    pub fn round_cents(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Adds another amount.
    pub fn add(&self, other: Money) -> Money {
        Self(self.0 + other.0)
    }

    /// Subtracts another amount, flooring the result at zero.
    pub fn saturating_sub(&self, other: Money) -> Money {
        let diff = self.0 - other.0;
        if diff < Decimal::ZERO {
            Self::ZERO
        } else {
            Self(diff)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
