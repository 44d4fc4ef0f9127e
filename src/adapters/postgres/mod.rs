//! PostgreSQL adapter implementations.
//!
//! Each repository uses sqlx with runtime-bound queries over a shared
//! connection pool. Aggregates are saved transactionally: child rows
//! (allocations, documents, steps) are replaced together with their
//! parent.

mod action_repository;
mod alert_repository;
mod budget_repository;
mod directory;
mod expense_repository;
mod history_repository;
mod threshold_repository;
mod workflow_repository;

pub use action_repository::PostgresActionRepository;
pub use alert_repository::PostgresAlertRepository;
pub use budget_repository::PostgresBudgetRepository;
pub use directory::PostgresDirectory;
pub use expense_repository::PostgresExpenseRepository;
pub use history_repository::PostgresHistoryRepository;
pub use threshold_repository::PostgresThresholdRepository;
pub use workflow_repository::PostgresWorkflowRepository;

use crate::domain::foundation::{DomainError, ErrorCode};

pub(crate) fn db_error(err: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Database error: {}", err))
}
