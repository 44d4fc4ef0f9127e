//! Budget-specific error types.

use rust_decimal::Decimal;

use crate::domain::foundation::{
    AlertId, BudgetId, DepartmentId, DomainError, ErrorCode, SegmentId, ThresholdId, UserId,
};

/// Errors raised by budget, threshold, and alert operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetError {
    /// Budget was not found or is soft-deleted.
    NotFound(BudgetId),

    /// Threshold was not found.
    ThresholdNotFound(ThresholdId),

    /// Alert was not found.
    AlertNotFound(AlertId),

    /// Referenced segment does not exist.
    SegmentNotFound(SegmentId),

    /// Referenced department does not exist.
    DepartmentNotFound(DepartmentId),

    /// Referenced recipient user does not exist.
    UserNotFound(UserId),

    /// A non-deleted budget with the same name, period, and date range
    /// already exists.
    DuplicateName(String),

    /// A threshold with this percentage already exists for the budget.
    DuplicateThreshold { percentage: Decimal },

    /// Threshold percentage is outside [0, 100].
    PercentageOutOfRange { value: Decimal },

    /// Start date is not before end date.
    InvalidDateRange,

    /// Optimistic-lock conflict on a budget update; safe to retry.
    ConcurrentModification(BudgetId),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl BudgetError {
    pub fn not_found(id: BudgetId) -> Self {
        BudgetError::NotFound(id)
    }

    pub fn threshold_not_found(id: ThresholdId) -> Self {
        BudgetError::ThresholdNotFound(id)
    }

    pub fn alert_not_found(id: AlertId) -> Self {
        BudgetError::AlertNotFound(id)
    }

    pub fn duplicate_name(name: impl Into<String>) -> Self {
        BudgetError::DuplicateName(name.into())
    }

    pub fn concurrent_modification(id: BudgetId) -> Self {
        BudgetError::ConcurrentModification(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BudgetError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BudgetError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BudgetError::NotFound(_) => ErrorCode::BudgetNotFound,
            BudgetError::ThresholdNotFound(_) => ErrorCode::ThresholdNotFound,
            BudgetError::AlertNotFound(_) => ErrorCode::AlertNotFound,
            BudgetError::SegmentNotFound(_) => ErrorCode::SegmentNotFound,
            BudgetError::DepartmentNotFound(_) => ErrorCode::DepartmentNotFound,
            BudgetError::UserNotFound(_) => ErrorCode::UserNotFound,
            BudgetError::DuplicateName(_) => ErrorCode::DuplicateName,
            BudgetError::DuplicateThreshold { .. } => ErrorCode::DuplicateThreshold,
            BudgetError::PercentageOutOfRange { .. } => ErrorCode::PercentageOutOfRange,
            BudgetError::InvalidDateRange => ErrorCode::InvalidDateRange,
            BudgetError::ConcurrentModification(_) => ErrorCode::ConcurrentModification,
            BudgetError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            BudgetError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            BudgetError::NotFound(id) => format!("Budget not found: {}", id),
            BudgetError::ThresholdNotFound(id) => format!("Threshold not found: {}", id),
            BudgetError::AlertNotFound(id) => format!("Alert not found: {}", id),
            BudgetError::SegmentNotFound(id) => format!("Segment not found: {}", id),
            BudgetError::DepartmentNotFound(id) => format!("Department not found: {}", id),
            BudgetError::UserNotFound(id) => format!("User not found: {}", id),
            BudgetError::DuplicateName(name) => {
                format!("Budget '{}' already exists for this period and range", name)
            }
            BudgetError::DuplicateThreshold { percentage } => {
                format!(
                    "Threshold with percentage {} already exists for this budget",
                    percentage
                )
            }
            BudgetError::PercentageOutOfRange { value } => {
                format!("Percentage must be between 0 and 100, got {}", value)
            }
            BudgetError::InvalidDateRange => "Start date must be before end date".to_string(),
            BudgetError::ConcurrentModification(id) => {
                format!("Budget {} was modified concurrently; retry the operation", id)
            }
            BudgetError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            BudgetError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    ///
    /// `ConcurrentModification` is the only error kind designed to be
    /// retried by callers; infrastructure failures may also be transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BudgetError::ConcurrentModification(_) | BudgetError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for BudgetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BudgetError {}

impl From<DomainError> for BudgetError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => BudgetError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => BudgetError::Infrastructure(err.to_string()),
        }
    }
}

impl From<BudgetError> for DomainError {
    fn from(err: BudgetError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
