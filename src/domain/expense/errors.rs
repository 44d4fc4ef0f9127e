//! Expense-specific error types.

use rust_decimal::Decimal;

use crate::domain::foundation::{DomainError, ErrorCode, ExpenseId, SegmentId, UserId};

use super::ExpenseStatus;

/// Errors raised by expense lifecycle and allocation operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseError {
    /// Expense was not found or is soft-deleted.
    NotFound(ExpenseId),

    /// Submitting user does not exist.
    SubmitterNotFound(UserId),

    /// Referenced segment does not exist.
    SegmentNotFound(SegmentId),

    /// Operation requires an editable expense (Draft or Rejected).
    NotEditable { status: ExpenseStatus },

    /// Lifecycle operation attempted from a disallowed state.
    InvalidTransition {
        from: ExpenseStatus,
        to: ExpenseStatus,
    },

    /// Allocation set was empty.
    EmptyAllocations,

    /// Allocation percentages do not sum to exactly 100.
    AllocationSumInvalid { sum: Decimal },

    /// An allocation percentage is outside (0, 100].
    PercentageOutOfRange { value: Decimal },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Optimistic-lock conflict while applying budget consumption for
    /// this expense; safe to retry.
    ConcurrentModification(String),

    /// Infrastructure error.
    Infrastructure(String),
}

impl ExpenseError {
    pub fn not_found(id: ExpenseId) -> Self {
        ExpenseError::NotFound(id)
    }

    pub fn submitter_not_found(id: UserId) -> Self {
        ExpenseError::SubmitterNotFound(id)
    }

    pub fn segment_not_found(id: SegmentId) -> Self {
        ExpenseError::SegmentNotFound(id)
    }

    pub fn not_editable(status: ExpenseStatus) -> Self {
        ExpenseError::NotEditable { status }
    }

    pub fn invalid_transition(from: ExpenseStatus, to: ExpenseStatus) -> Self {
        ExpenseError::InvalidTransition { from, to }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ExpenseError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ExpenseError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ExpenseError::NotFound(_) => ErrorCode::ExpenseNotFound,
            ExpenseError::SubmitterNotFound(_) => ErrorCode::UserNotFound,
            ExpenseError::SegmentNotFound(_) => ErrorCode::SegmentNotFound,
            ExpenseError::NotEditable { .. } | ExpenseError::InvalidTransition { .. } => {
                ErrorCode::InvalidStateTransition
            }
            ExpenseError::EmptyAllocations => ErrorCode::ValidationFailed,
            ExpenseError::AllocationSumInvalid { .. } => ErrorCode::AllocationSumInvalid,
            ExpenseError::PercentageOutOfRange { .. } => ErrorCode::PercentageOutOfRange,
            ExpenseError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ExpenseError::ConcurrentModification(_) => ErrorCode::ConcurrentModification,
            ExpenseError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            ExpenseError::NotFound(id) => format!("Expense not found: {}", id),
            ExpenseError::SubmitterNotFound(id) => format!("Submitter not found: {}", id),
            ExpenseError::SegmentNotFound(id) => format!("Segment not found: {}", id),
            ExpenseError::NotEditable { status } => {
                format!("Expense cannot be modified in {} status", status)
            }
            ExpenseError::InvalidTransition { from, to } => {
                format!("Cannot transition expense from {} to {}", from, to)
            }
            ExpenseError::EmptyAllocations => {
                "At least one segment allocation is required".to_string()
            }
            ExpenseError::AllocationSumInvalid { sum } => {
                format!("Segment allocations must sum to 100%. Current sum: {}", sum)
            }
            ExpenseError::PercentageOutOfRange { value } => {
                format!("Allocation percentage must be in (0, 100], got {}", value)
            }
            ExpenseError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ExpenseError::ConcurrentModification(what) => {
                format!("Concurrent modification of {}; retry the operation", what)
            }
            ExpenseError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExpenseError::Infrastructure(_) | ExpenseError::ConcurrentModification(_)
        )
    }
}

impl std::fmt::Display for ExpenseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ExpenseError {}

impl From<DomainError> for ExpenseError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => ExpenseError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => ExpenseError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ExpenseError> for DomainError {
    fn from(err: ExpenseError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn invalid_transition_maps_to_state_code() {
        let err =
            ExpenseError::invalid_transition(ExpenseStatus::Draft, ExpenseStatus::Approved);
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
        assert!(err.message().contains("DRAFT"));
        assert!(err.message().contains("APPROVED"));
    }

    #[test]
    fn allocation_sum_invalid_carries_actual_sum() {
        let err = ExpenseError::AllocationSumInvalid { sum: dec!(110) };
        assert_eq!(err.code(), ErrorCode::AllocationSumInvalid);
        assert!(err.message().contains("110"));
    }

    #[test]
    fn not_editable_names_the_status() {
        let err = ExpenseError::not_editable(ExpenseStatus::Approved);
        assert!(err.message().contains("APPROVED"));
    }

    #[test]
    fn only_infrastructure_is_retryable() {
        assert!(ExpenseError::infrastructure("timeout").is_retryable());
        assert!(!ExpenseError::EmptyAllocations.is_retryable());
    }

    #[test]
    fn converts_to_domain_error() {
        let err = ExpenseError::not_found(ExpenseId::new());
        let domain: DomainError = err.clone().into();
        assert_eq!(domain.code, err.code());
    }
}
