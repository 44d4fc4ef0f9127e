//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the Outlay domain.

mod errors;
mod ids;
mod money;
mod percentage;
mod record_meta;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    AlertId, BudgetId, DepartmentId, ExpenseId, HistoryId, RoleId, SegmentId, StepId,
    ThresholdId, UserId, WorkflowId,
};
pub use money::Money;
pub use percentage::Percentage;
pub use record_meta::RecordMetadata;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
