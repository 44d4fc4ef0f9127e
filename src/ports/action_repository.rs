//! Approval action repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ExpenseId, StepId, UserId};
use crate::domain::workflow::{ApprovalAction, ApprovalActionKind};

/// Repository port for the append-only approval action log.
///
/// Actions are immutable facts: there is no update or delete.
#[async_trait]
pub trait ApprovalActionRepository: Send + Sync {
    /// Appends an action to the log.
    async fn append(&self, action: &ApprovalAction) -> Result<(), DomainError>;

    /// Lists actions for an expense, most recent first.
    async fn find_by_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Vec<ApprovalAction>, DomainError>;

    /// Finds the most recent action for an expense.
    async fn latest_for_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Option<ApprovalAction>, DomainError>;

    /// Lists actions taken by an approver.
    async fn find_by_approver(
        &self,
        approver: UserId,
    ) -> Result<Vec<ApprovalAction>, DomainError>;

    /// Returns true iff an APPROVED action exists for the (expense, step)
    /// pair. Used to gate progression through mandatory steps.
    async fn has_approved_at_step(
        &self,
        expense_id: ExpenseId,
        step_id: StepId,
    ) -> Result<bool, DomainError>;

    /// Counts actions of a kind taken by an approver.
    async fn count_by_approver_and_kind(
        &self,
        approver: UserId,
        kind: ApprovalActionKind,
    ) -> Result<u64, DomainError>;

    /// Lists delegations addressed to a user.
    async fn find_delegations_to(&self, user: UserId)
        -> Result<Vec<ApprovalAction>, DomainError>;
}
