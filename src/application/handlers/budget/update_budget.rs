//! UpdateBudgetHandler - edits budget fields under the version check.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::budget::{Budget, BudgetError};
use crate::domain::foundation::{BudgetId, ErrorCode, Money};
use crate::ports::{budget_key, BudgetRepository, Cache};

/// Command to update a budget.
#[derive(Debug, Clone)]
pub struct UpdateBudgetCommand {
    pub budget_id: BudgetId,
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub allocated_amount: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Handler for budget updates. Propagates `ConcurrentModification` for
/// the caller to retry after a reload.
pub struct UpdateBudgetHandler {
    budgets: Arc<dyn BudgetRepository>,
    cache: Arc<dyn Cache>,
}

impl UpdateBudgetHandler {
    pub fn new(budgets: Arc<dyn BudgetRepository>, cache: Arc<dyn Cache>) -> Self {
        Self { budgets, cache }
    }

    pub async fn handle(&self, cmd: UpdateBudgetCommand) -> Result<Budget, BudgetError> {
        let mut budget = self
            .budgets
            .find_by_id(cmd.budget_id)
            .await?
            .ok_or(BudgetError::NotFound(cmd.budget_id))?;

        if let Some(name) = cmd.name {
            budget.name = name;
        }
        let start = cmd.start_date.unwrap_or(budget.start_date);
        let end = cmd.end_date.unwrap_or(budget.end_date);
        if (start, end) != (budget.start_date, budget.end_date) {
            budget.reschedule(start, end)?;
        }
        if let Some(allocated) = cmd.allocated_amount {
            budget.allocated = Money::try_new(allocated)
                .map_err(|e| BudgetError::validation("allocated_amount", e.to_string()))?;
        }
        if let Some(is_active) = cmd.is_active {
            if is_active {
                budget.activate();
            } else {
                budget.deactivate();
            }
        }

        self.persist(&budget).await?;
        Ok(budget)
    }

    async fn persist(&self, budget: &Budget) -> Result<(), BudgetError> {
        self.budgets.update(budget).await.map_err(|e| {
            if e.code == ErrorCode::ConcurrentModification {
                BudgetError::concurrent_modification(budget.id)
            } else {
                BudgetError::from(e)
            }
        })?;
        self.cache.invalidate(&budget_key(budget.id)).await?;
        tracing::info!(budget_id = %budget.id, "budget updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryBudgetRepository, InMemoryCache};
    use crate::domain::budget::BudgetPeriod;
    use rust_decimal_macros::dec;

    fn seeded_budget() -> Budget {
        Budget::create(
            "Engineering Q3".to_string(),
            None,
            None,
            BudgetPeriod::Quarterly,
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            Money::try_new(dec!(50000.00)).unwrap(),
        )
        .unwrap()
    }

    fn bare_command(budget_id: BudgetId) -> UpdateBudgetCommand {
        UpdateBudgetCommand {
            budget_id,
            name: None,
            start_date: None,
            end_date: None,
            allocated_amount: None,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn updates_allocation_and_bumps_version() {
        let budgets = Arc::new(InMemoryBudgetRepository::new());
        let budget = seeded_budget();
        budgets.insert(&budget).await.unwrap();

        let mut cmd = bare_command(budget.id);
        cmd.allocated_amount = Some(dec!(60000.00));

        UpdateBudgetHandler::new(budgets.clone(), Arc::new(InMemoryCache::new()))
            .handle(cmd)
            .await
            .unwrap();

        let stored = budgets.find_by_id(budget.id).await.unwrap().unwrap();
        assert_eq!(stored.allocated.amount(), dec!(60000.00));
        assert_eq!(stored.meta.version, 1);
    }

    #[tokio::test]
    async fn invalid_reschedule_is_rejected() {
        let budgets = Arc::new(InMemoryBudgetRepository::new());
        let budget = seeded_budget();
        budgets.insert(&budget).await.unwrap();

        let mut cmd = bare_command(budget.id);
        cmd.end_date = Some(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());

        let result = UpdateBudgetHandler::new(budgets, Arc::new(InMemoryCache::new()))
            .handle(cmd)
            .await;
        assert!(matches!(result, Err(BudgetError::InvalidDateRange)));
    }

    #[tokio::test]
    async fn cache_entry_is_invalidated_on_update() {
        let budgets = Arc::new(InMemoryBudgetRepository::new());
        let cache = Arc::new(InMemoryCache::new());
        let budget = seeded_budget();
        budgets.insert(&budget).await.unwrap();
        cache
            .set(&budget_key(budget.id), "stale", 300)
            .await
            .unwrap();

        let mut cmd = bare_command(budget.id);
        cmd.is_active = Some(false);

        UpdateBudgetHandler::new(budgets, cache.clone())
            .handle(cmd)
            .await
            .unwrap();

        assert_eq!(cache.get(&budget_key(budget.id)).await.unwrap(), None);
    }
}
