//! Segment allocations and their validation.
//!
//! An expense is split across reporting segments by percentage. The
//! validator is a pure function: it either proves the split well-formed
//! and derives the per-segment amounts, or reports exactly why not.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{Money, Percentage, SegmentId};

use super::ExpenseError;

/// One requested split line, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRequest {
    pub segment_id: SegmentId,
    pub percentage: Decimal,
    pub description: Option<String>,
}

/// The percentage/amount split of one expense against one segment.
///
/// Exists only inside its owning [`Expense`](super::Expense); the whole
/// set is replaced atomically when the expense is edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentAllocation {
    pub id: Uuid,
    pub segment_id: SegmentId,
    pub amount: Money,
    pub percentage: Percentage,
    pub description: Option<String>,
}

/// Validates an allocation request set and derives per-segment amounts.
///
/// Rules:
/// - the set must be non-empty;
/// - each percentage must be in (0, 100];
/// - percentages must sum to exactly 100 (decimal equality, never floats).
///
/// Each amount is `total x percentage / 100` rounded half-up to cents.
/// The amounts are rounded independently, so their sum may drift from
/// the total by a cent or two; the drift is accepted, not redistributed.
pub fn validate_allocations(
    total_amount: Money,
    requests: &[AllocationRequest],
) -> Result<Vec<SegmentAllocation>, ExpenseError> {
    if requests.is_empty() {
        return Err(ExpenseError::EmptyAllocations);
    }

    for request in requests {
        if request.percentage <= Decimal::ZERO || request.percentage > Decimal::ONE_HUNDRED {
            return Err(ExpenseError::PercentageOutOfRange {
                value: request.percentage,
            });
        }
    }

    let sum: Decimal = requests.iter().map(|r| r.percentage).sum();
    if sum != Decimal::ONE_HUNDRED {
        return Err(ExpenseError::AllocationSumInvalid { sum });
    }

    let mut allocations = Vec::with_capacity(requests.len());
    for request in requests {
        let raw = total_amount.amount() * request.percentage / Decimal::ONE_HUNDRED;
        let amount = Money::try_new(raw)
            .map_err(|e| ExpenseError::validation("amount", e.to_string()))?
            .round_cents();
        let percentage = Percentage::try_new(request.percentage).map_err(|_| {
            ExpenseError::PercentageOutOfRange {
                value: request.percentage,
            }
        })?;
        allocations.push(SegmentAllocation {
            id: Uuid::new_v4(),
            segment_id: request.segment_id,
            amount,
            percentage,
            description: request.description.clone(),
        });
    }

    Ok(allocations)
}
