//! ApprovalQueries - read side of the approval engine.

use std::sync::Arc;

use crate::domain::foundation::{ExpenseId, StepId, UserId};
use crate::domain::workflow::{ApprovalAction, ApprovalActionKind, WorkflowError, WorkflowHistory};
use crate::ports::{ApprovalActionRepository, WorkflowHistoryRepository};

/// Queries over recorded actions and transition history.
pub struct ApprovalQueries {
    actions: Arc<dyn ApprovalActionRepository>,
    history: Arc<dyn WorkflowHistoryRepository>,
}

impl ApprovalQueries {
    pub fn new(
        actions: Arc<dyn ApprovalActionRepository>,
        history: Arc<dyn WorkflowHistoryRepository>,
    ) -> Self {
        Self { actions, history }
    }

    /// True iff an APPROVED action exists for the (expense, step) pair.
    /// Gates progression through mandatory steps.
    pub async fn has_approved_at_step(
        &self,
        expense_id: ExpenseId,
        step_id: StepId,
    ) -> Result<bool, WorkflowError> {
        Ok(self.actions.has_approved_at_step(expense_id, step_id).await?)
    }

    /// Most recent action recorded for an expense.
    pub async fn latest_action(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Option<ApprovalAction>, WorkflowError> {
        Ok(self.actions.latest_for_expense(expense_id).await?)
    }

    /// All actions for an expense, most recent first.
    pub async fn actions_for_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Vec<ApprovalAction>, WorkflowError> {
        Ok(self.actions.find_by_expense(expense_id).await?)
    }

    /// Count of actions of one kind taken by an approver.
    pub async fn count_by_approver_and_kind(
        &self,
        approver: UserId,
        kind: ApprovalActionKind,
    ) -> Result<u64, WorkflowError> {
        Ok(self.actions.count_by_approver_and_kind(approver, kind).await?)
    }

    /// Delegations addressed to a user.
    pub async fn delegations_to(
        &self,
        user: UserId,
    ) -> Result<Vec<ApprovalAction>, WorkflowError> {
        Ok(self.actions.find_delegations_to(user).await?)
    }

    /// Transition history for an expense, most recent first.
    pub async fn history_for_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Vec<WorkflowHistory>, WorkflowError> {
        Ok(self.history.find_by_expense(expense_id).await?)
    }

    /// Most recent transition for an expense.
    pub async fn latest_history(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Option<WorkflowHistory>, WorkflowError> {
        Ok(self.history.latest_for_expense(expense_id).await?)
    }
}
