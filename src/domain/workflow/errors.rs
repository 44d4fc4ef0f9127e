//! Approval-workflow-specific error types.

use crate::domain::foundation::{
    DomainError, ErrorCode, ExpenseId, RoleId, StepId, UserId, WorkflowId,
};

/// Errors raised by workflow management and action recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// Workflow was not found or is soft-deleted.
    NotFound(WorkflowId),

    /// No workflow exists with this name.
    NotFoundByName(String),

    /// Referenced step does not exist.
    StepNotFound(StepId),

    /// Referenced expense does not exist.
    ExpenseNotFound(ExpenseId),

    /// Referenced approver role does not exist.
    RoleNotFound(RoleId),

    /// Referenced user does not exist.
    UserNotFound(UserId),

    /// Another non-deleted workflow already uses this name.
    DuplicateName(String),

    /// Two steps in the same workflow share an order.
    DuplicateStepOrder(i32),

    /// Workflow is inactive and cannot govern approvals.
    Inactive(WorkflowId),

    /// Action kind string could not be parsed.
    InvalidActionKind(String),

    /// A delegation action is missing its delegate.
    MissingDelegate,

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl WorkflowError {
    pub fn not_found(id: WorkflowId) -> Self {
        WorkflowError::NotFound(id)
    }

    pub fn step_not_found(id: StepId) -> Self {
        WorkflowError::StepNotFound(id)
    }

    pub fn duplicate_name(name: impl Into<String>) -> Self {
        WorkflowError::DuplicateName(name.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WorkflowError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        WorkflowError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            WorkflowError::NotFound(_) | WorkflowError::NotFoundByName(_) => {
                ErrorCode::WorkflowNotFound
            }
            WorkflowError::StepNotFound(_) => ErrorCode::StepNotFound,
            WorkflowError::ExpenseNotFound(_) => ErrorCode::ExpenseNotFound,
            WorkflowError::RoleNotFound(_) => ErrorCode::RoleNotFound,
            WorkflowError::UserNotFound(_) => ErrorCode::UserNotFound,
            WorkflowError::DuplicateName(_) => ErrorCode::DuplicateName,
            WorkflowError::DuplicateStepOrder(_) => ErrorCode::DuplicateStepOrder,
            WorkflowError::Inactive(_) => ErrorCode::InvalidStateTransition,
            WorkflowError::InvalidActionKind(_) => ErrorCode::InvalidEnumValue,
            WorkflowError::MissingDelegate | WorkflowError::ValidationFailed { .. } => {
                ErrorCode::ValidationFailed
            }
            WorkflowError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            WorkflowError::NotFound(id) => format!("Workflow not found: {}", id),
            WorkflowError::NotFoundByName(name) => {
                format!("Workflow not found with name: {}", name)
            }
            WorkflowError::StepNotFound(id) => format!("Approval step not found: {}", id),
            WorkflowError::ExpenseNotFound(id) => format!("Expense not found: {}", id),
            WorkflowError::RoleNotFound(id) => format!("Role not found: {}", id),
            WorkflowError::UserNotFound(id) => format!("User not found: {}", id),
            WorkflowError::DuplicateName(name) => {
                format!("Workflow with name '{}' already exists", name)
            }
            WorkflowError::DuplicateStepOrder(order) => {
                format!("Step order {} is used more than once", order)
            }
            WorkflowError::Inactive(id) => format!("Workflow {} is inactive", id),
            WorkflowError::InvalidActionKind(value) => {
                format!("Unknown approval action kind: {}", value)
            }
            WorkflowError::MissingDelegate => {
                "A delegation must name the user it delegates to".to_string()
            }
            WorkflowError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            WorkflowError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkflowError::Infrastructure(_))
    }
}

impl std::fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for WorkflowError {}

impl From<DomainError> for WorkflowError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidEnumValue => WorkflowError::InvalidActionKind(err.message),
            ErrorCode::ValidationFailed => WorkflowError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => WorkflowError::Infrastructure(err.to_string()),
        }
    }
}

impl From<WorkflowError> for DomainError {
    fn from(err: WorkflowError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_maps_to_duplicate_code() {
        let err = WorkflowError::duplicate_name("Default Approval");
        assert_eq!(err.code(), ErrorCode::DuplicateName);
        assert!(err.message().contains("Default Approval"));
    }

    #[test]
    fn duplicate_step_order_names_the_order() {
        let err = WorkflowError::DuplicateStepOrder(2);
        assert_eq!(err.code(), ErrorCode::DuplicateStepOrder);
        assert!(err.message().contains('2'));
    }

    #[test]
    fn invalid_action_kind_maps_to_enum_code() {
        let err = WorkflowError::InvalidActionKind("ESCALATED".to_string());
        assert_eq!(err.code(), ErrorCode::InvalidEnumValue);
    }

    #[test]
    fn only_infrastructure_is_retryable() {
        assert!(WorkflowError::infrastructure("timeout").is_retryable());
        assert!(!WorkflowError::MissingDelegate.is_retryable());
    }

    #[test]
    fn converts_to_domain_error() {
        let err = WorkflowError::not_found(WorkflowId::new());
        let domain: DomainError = err.clone().into();
        assert_eq!(domain.code, ErrorCode::WorkflowNotFound);
    }
}
