//! Workflow history repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ExpenseId, UserId};
use crate::domain::workflow::WorkflowHistory;

/// Repository port for the append-only status transition audit trail.
///
/// History rows are never mutated or deleted; the only failure mode of
/// `append` is a storage error.
#[async_trait]
pub trait WorkflowHistoryRepository: Send + Sync {
    /// Appends one transition record.
    async fn append(&self, record: &WorkflowHistory) -> Result<(), DomainError>;

    /// Lists records for an expense, most recent first.
    async fn find_by_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Vec<WorkflowHistory>, DomainError>;

    /// Finds the most recent record for an expense.
    async fn latest_for_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Option<WorkflowHistory>, DomainError>;

    /// Lists records for transitions performed by an actor.
    async fn find_by_actor(&self, actor: UserId) -> Result<Vec<WorkflowHistory>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn WorkflowHistoryRepository) {}
    }
}
