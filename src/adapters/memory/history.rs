//! In-memory workflow history log.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ExpenseId, UserId};
use crate::domain::workflow::WorkflowHistory;
use crate::ports::WorkflowHistoryRepository;

/// Append-only in-memory transition audit trail.
#[derive(Debug, Default)]
pub struct InMemoryHistoryRepository {
    records: Arc<RwLock<Vec<WorkflowHistory>>>,
}

impl InMemoryHistoryRepository {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkflowHistoryRepository for InMemoryHistoryRepository {
    async fn append(&self, record: &WorkflowHistory) -> Result<(), DomainError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn find_by_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Vec<WorkflowHistory>, DomainError> {
        let mut records: Vec<_> = self
            .records
            .read()
            .await
            .iter()
            .filter(|h| h.expense_id == expense_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    async fn latest_for_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Option<WorkflowHistory>, DomainError> {
        Ok(self.find_by_expense(expense_id).await?.into_iter().next())
    }

    async fn find_by_actor(&self, actor: UserId) -> Result<Vec<WorkflowHistory>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|h| h.actor == actor)
            .cloned()
            .collect())
    }
}
