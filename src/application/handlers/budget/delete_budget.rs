//! DeleteBudgetHandler - soft-deletes a budget.

use std::sync::Arc;

use crate::domain::budget::BudgetError;
use crate::domain::foundation::{BudgetId, ErrorCode};
use crate::ports::{budget_key, BudgetRepository, Cache};

/// Command to soft-delete a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetCommand {
    pub budget_id: BudgetId,
}

/// Handler for budget deletion.
pub struct DeleteBudgetHandler {
    budgets: Arc<dyn BudgetRepository>,
    cache: Arc<dyn Cache>,
}

impl DeleteBudgetHandler {
    pub fn new(budgets: Arc<dyn BudgetRepository>, cache: Arc<dyn Cache>) -> Self {
        Self { budgets, cache }
    }

    pub async fn handle(&self, cmd: DeleteBudgetCommand) -> Result<(), BudgetError> {
        let mut budget = self
            .budgets
            .find_by_id(cmd.budget_id)
            .await?
            .ok_or(BudgetError::NotFound(cmd.budget_id))?;

        budget.soft_delete();
        self.budgets.update(&budget).await.map_err(|e| {
            if e.code == ErrorCode::ConcurrentModification {
                BudgetError::concurrent_modification(budget.id)
            } else {
                BudgetError::from(e)
            }
        })?;
        self.cache.invalidate(&budget_key(budget.id)).await?;

        tracing::info!(budget_id = %budget.id, "budget deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryBudgetRepository, InMemoryCache};
    use crate::domain::budget::{Budget, BudgetPeriod};
    use crate::domain::foundation::Money;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn deleted_budget_leaves_matching() {
        let budgets = Arc::new(InMemoryBudgetRepository::new());
        let budget = Budget::create(
            "Engineering Q3".to_string(),
            None,
            None,
            BudgetPeriod::Quarterly,
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            Money::try_new(dec!(50000.00)).unwrap(),
        )
        .unwrap();
        budgets.insert(&budget).await.unwrap();

        DeleteBudgetHandler::new(budgets.clone(), Arc::new(InMemoryCache::new()))
            .handle(DeleteBudgetCommand {
                budget_id: budget.id,
            })
            .await
            .unwrap();

        assert!(budgets.find_by_id(budget.id).await.unwrap().is_none());
        assert!(budgets.list_active().await.unwrap().is_empty());
    }
}
