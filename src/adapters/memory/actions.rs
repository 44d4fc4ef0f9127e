//! In-memory approval action log.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ExpenseId, StepId, UserId};
use crate::domain::workflow::{ApprovalAction, ApprovalActionKind};
use crate::ports::ApprovalActionRepository;

/// Append-only in-memory action log.
#[derive(Debug, Default)]
pub struct InMemoryActionRepository {
    actions: Arc<RwLock<Vec<ApprovalAction>>>,
}

impl InMemoryActionRepository {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApprovalActionRepository for InMemoryActionRepository {
    async fn append(&self, action: &ApprovalAction) -> Result<(), DomainError> {
        self.actions.write().await.push(action.clone());
        Ok(())
    }

    async fn find_by_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Vec<ApprovalAction>, DomainError> {
        let mut actions: Vec<_> = self
            .actions
            .read()
            .await
            .iter()
            .filter(|a| a.expense_id == expense_id)
            .cloned()
            .collect();
        actions.sort_by(|a, b| b.action_date.cmp(&a.action_date));
        Ok(actions)
    }

    async fn latest_for_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Option<ApprovalAction>, DomainError> {
        Ok(self.find_by_expense(expense_id).await?.into_iter().next())
    }

    async fn find_by_approver(
        &self,
        approver: UserId,
    ) -> Result<Vec<ApprovalAction>, DomainError> {
        Ok(self
            .actions
            .read()
            .await
            .iter()
            .filter(|a| a.approver == approver)
            .cloned()
            .collect())
    }

    async fn has_approved_at_step(
        &self,
        expense_id: ExpenseId,
        step_id: StepId,
    ) -> Result<bool, DomainError> {
        Ok(self
            .actions
            .read()
            .await
            .iter()
            .any(|a| a.expense_id == expense_id && a.approves_step(step_id)))
    }

    async fn count_by_approver_and_kind(
        &self,
        approver: UserId,
        kind: ApprovalActionKind,
    ) -> Result<u64, DomainError> {
        Ok(self
            .actions
            .read()
            .await
            .iter()
            .filter(|a| a.approver == approver && a.kind == kind)
            .count() as u64)
    }

    async fn find_delegations_to(
        &self,
        user: UserId,
    ) -> Result<Vec<ApprovalAction>, DomainError> {
        Ok(self
            .actions
            .read()
            .await
            .iter()
            .filter(|a| a.kind == ApprovalActionKind::Delegated && a.delegated_to == Some(user))
            .cloned()
            .collect())
    }
}
