//! In-memory budget repository with optimistic locking.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::budget::{Budget, BudgetPeriod};
use crate::domain::foundation::{BudgetId, DepartmentId, DomainError, ErrorCode, SegmentId};
use crate::ports::BudgetRepository;

/// In-memory budget store enforcing the version compare-and-swap that
/// the Postgres adapter performs with `WHERE version = $n`.
#[derive(Debug, Default)]
pub struct InMemoryBudgetRepository {
    budgets: Arc<RwLock<HashMap<BudgetId, Budget>>>,
}

impl InMemoryBudgetRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BudgetRepository for InMemoryBudgetRepository {
    async fn insert(&self, budget: &Budget) -> Result<(), DomainError> {
        self.budgets.write().await.insert(budget.id, budget.clone());
        Ok(())
    }

    async fn update(&self, budget: &Budget) -> Result<(), DomainError> {
        let mut budgets = self.budgets.write().await;
        let stored = budgets.get(&budget.id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::BudgetNotFound,
                format!("Budget not found: {}", budget.id),
            )
        })?;

        if stored.meta.version != budget.meta.version {
            return Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                format!(
                    "Budget {} version {} does not match stored version {}",
                    budget.id, budget.meta.version, stored.meta.version
                ),
            ));
        }

        let mut updated = budget.clone();
        updated.meta.bump_version();
        budgets.insert(budget.id, updated);
        Ok(())
    }

    async fn find_by_id(&self, id: BudgetId) -> Result<Option<Budget>, DomainError> {
        Ok(self
            .budgets
            .read()
            .await
            .get(&id)
            .filter(|b| !b.meta.is_deleted())
            .cloned())
    }

    async fn exists_by_name_period_range(
        &self,
        name: &str,
        period: BudgetPeriod,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<bool, DomainError> {
        Ok(self.budgets.read().await.values().any(|b| {
            !b.meta.is_deleted()
                && b.name == name
                && b.period == period
                && b.start_date == start_date
                && b.end_date == end_date
        }))
    }

    async fn find_active_for_segment_on(
        &self,
        segment_id: SegmentId,
        date: NaiveDate,
    ) -> Result<Vec<Budget>, DomainError> {
        Ok(self
            .budgets
            .read()
            .await
            .values()
            .filter(|b| b.matches(segment_id, date))
            .cloned()
            .collect())
    }

    async fn find_active_for_department_on(
        &self,
        department_id: DepartmentId,
        date: NaiveDate,
    ) -> Result<Vec<Budget>, DomainError> {
        Ok(self
            .budgets
            .read()
            .await
            .values()
            .filter(|b| {
                b.is_active
                    && !b.meta.is_deleted()
                    && b.department_id == Some(department_id)
                    && b.covers_date(date)
            })
            .cloned()
            .collect())
    }

    async fn find_current(&self, date: NaiveDate) -> Result<Vec<Budget>, DomainError> {
        Ok(self
            .budgets
            .read()
            .await
            .values()
            .filter(|b| !b.meta.is_deleted() && b.covers_date(date))
            .cloned()
            .collect())
    }

    async fn list_active(&self) -> Result<Vec<Budget>, DomainError> {
        Ok(self
            .budgets
            .read()
            .await
            .values()
            .filter(|b| !b.meta.is_deleted() && b.is_active)
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Budget>, DomainError> {
        Ok(self
            .budgets
            .read()
            .await
            .values()
            .filter(|b| !b.meta.is_deleted())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;
    use rust_decimal_macros::dec;

    fn budget() -> Budget {
        Budget::create(
            "Ops Q1".to_string(),
            Some(SegmentId::new()),
            None,
            BudgetPeriod::Quarterly,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            Money::try_new(dec!(10000.00)).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn stale_version_update_is_rejected() {
        let repo = InMemoryBudgetRepository::new();
        let budget = budget();
        repo.insert(&budget).await.unwrap();

        // First writer wins.
        let mut first = repo.find_by_id(budget.id).await.unwrap().unwrap();
        first.add_consumption(Money::try_new(dec!(100.00)).unwrap());
        repo.update(&first).await.unwrap();

        // Second writer still holds version 0 and must fail.
        let mut second = budget.clone();
        second.add_consumption(Money::try_new(dec!(200.00)).unwrap());
        let err = repo.update(&second).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrentModification);

        // Reloading picks up the new version and succeeds.
        let mut reloaded = repo.find_by_id(budget.id).await.unwrap().unwrap();
        reloaded.add_consumption(Money::try_new(dec!(200.00)).unwrap());
        repo.update(&reloaded).await.unwrap();

        let stored = repo.find_by_id(budget.id).await.unwrap().unwrap();
        assert_eq!(stored.consumed.amount(), dec!(300.00));
        assert_eq!(stored.meta.version, 2);
    }

    #[tokio::test]
    async fn deleted_budgets_are_filtered() {
        let repo = InMemoryBudgetRepository::new();
        let mut budget = budget();
        budget.soft_delete();
        repo.insert(&budget).await.unwrap();

        assert!(repo.find_by_id(budget.id).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
