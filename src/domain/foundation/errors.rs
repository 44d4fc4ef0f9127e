//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        actual: String,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(
        field: impl Into<String>,
        min: impl fmt::Display,
        max: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min: min.to_string(),
            max: max.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    OutOfRange,
    InvalidFormat,
    InvalidEnumValue,
    PercentageOutOfRange,
    AllocationSumInvalid,
    InvalidDateRange,

    // Not found errors
    ExpenseNotFound,
    SegmentNotFound,
    DepartmentNotFound,
    UserNotFound,
    RoleNotFound,
    WorkflowNotFound,
    StepNotFound,
    BudgetNotFound,
    ThresholdNotFound,
    AlertNotFound,
    HistoryNotFound,
    ActionNotFound,

    // State and uniqueness errors
    InvalidStateTransition,
    DuplicateName,
    DuplicateStepOrder,
    DuplicateThreshold,
    ConcurrentModification,

    // Infrastructure errors
    DatabaseError,
    CacheError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::InvalidEnumValue => "INVALID_ENUM_VALUE",
            ErrorCode::PercentageOutOfRange => "PERCENTAGE_OUT_OF_RANGE",
            ErrorCode::AllocationSumInvalid => "ALLOCATION_SUM_INVALID",
            ErrorCode::InvalidDateRange => "INVALID_DATE_RANGE",
            ErrorCode::ExpenseNotFound => "EXPENSE_NOT_FOUND",
            ErrorCode::SegmentNotFound => "SEGMENT_NOT_FOUND",
            ErrorCode::DepartmentNotFound => "DEPARTMENT_NOT_FOUND",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::RoleNotFound => "ROLE_NOT_FOUND",
            ErrorCode::WorkflowNotFound => "WORKFLOW_NOT_FOUND",
            ErrorCode::StepNotFound => "STEP_NOT_FOUND",
            ErrorCode::BudgetNotFound => "BUDGET_NOT_FOUND",
            ErrorCode::ThresholdNotFound => "THRESHOLD_NOT_FOUND",
            ErrorCode::AlertNotFound => "ALERT_NOT_FOUND",
            ErrorCode::HistoryNotFound => "HISTORY_NOT_FOUND",
            ErrorCode::ActionNotFound => "ACTION_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::DuplicateName => "DUPLICATE_NAME",
            ErrorCode::DuplicateStepOrder => "DUPLICATE_STEP_ORDER",
            ErrorCode::DuplicateThreshold => "DUPLICATE_THRESHOLD",
            ErrorCode::ConcurrentModification => "CONCURRENT_MODIFICATION",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::CacheError => "CACHE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns true if a caller may retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::ConcurrentModification | ErrorCode::DatabaseError | ErrorCode::CacheError
        )
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("vendor");
        assert_eq!(format!("{}", err), "Field 'vendor' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("percentage", 0, 100, 150);
        assert_eq!(
            format!("{}", err),
            "Field 'percentage' must be between 0 and 100, got 150"
        );
    }

    #[test]
    fn validation_error_invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("currency", "must be three letters");
        assert_eq!(
            format!("{}", err),
            "Field 'currency' has invalid format: must be three letters"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::ExpenseNotFound, "Expense not found");
        assert_eq!(format!("{}", err), "[EXPENSE_NOT_FOUND] Expense not found");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::ValidationFailed, "Validation failed")
            .with_detail("field", "percentage")
            .with_detail("reason", "out of range");

        assert_eq!(err.details.get("field"), Some(&"percentage".to_string()));
        assert_eq!(err.details.get("reason"), Some(&"out of range".to_string()));
    }

    #[test]
    fn concurrent_modification_is_retryable() {
        let err = DomainError::new(ErrorCode::ConcurrentModification, "version conflict");
        assert!(err.is_retryable());
    }

    #[test]
    fn allocation_sum_invalid_is_not_retryable() {
        let err = DomainError::new(ErrorCode::AllocationSumInvalid, "sum is 110");
        assert!(!err.is_retryable());
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::BudgetNotFound), "BUDGET_NOT_FOUND");
        assert_eq!(
            format!("{}", ErrorCode::ConcurrentModification),
            "CONCURRENT_MODIFICATION"
        );
    }
}
