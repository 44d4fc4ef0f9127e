//! In-memory expense repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::expense::{Expense, ExpenseStatus};
use crate::domain::foundation::{DomainError, ErrorCode, ExpenseId, UserId};
use crate::ports::ExpenseRepository;

/// In-memory expense store keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryExpenseRepository {
    expenses: Arc<RwLock<HashMap<ExpenseId, Expense>>>,
}

impl InMemoryExpenseRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryExpenseRepository {
    async fn insert(&self, expense: &Expense) -> Result<(), DomainError> {
        self.expenses
            .write()
            .await
            .insert(expense.id, expense.clone());
        Ok(())
    }

    async fn update(&self, expense: &Expense) -> Result<(), DomainError> {
        let mut expenses = self.expenses.write().await;
        if !expenses.contains_key(&expense.id) {
            return Err(DomainError::new(
                ErrorCode::ExpenseNotFound,
                format!("Expense not found: {}", expense.id),
            ));
        }
        expenses.insert(expense.id, expense.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, DomainError> {
        Ok(self
            .expenses
            .read()
            .await
            .get(&id)
            .filter(|e| !e.meta.is_deleted())
            .cloned())
    }

    async fn find_by_submitter(&self, submitter: UserId) -> Result<Vec<Expense>, DomainError> {
        Ok(self
            .expenses
            .read()
            .await
            .values()
            .filter(|e| !e.meta.is_deleted() && e.submitter == submitter)
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: ExpenseStatus) -> Result<Vec<Expense>, DomainError> {
        Ok(self
            .expenses
            .read()
            .await
            .values()
            .filter(|e| !e.meta.is_deleted() && e.status == status)
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Expense>, DomainError> {
        Ok(self
            .expenses
            .read()
            .await
            .values()
            .filter(|e| !e.meta.is_deleted())
            .cloned()
            .collect())
    }
}
