//! BudgetConsumptionTracker - applies approved expenses against budgets.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::budget::{Budget, BudgetError};
use crate::domain::expense::Expense;
use crate::domain::foundation::{BudgetId, ErrorCode, SegmentId};
use crate::ports::{budget_key, BudgetRepository, Cache, Directory};

/// Applies and reverses budget consumption for an expense.
///
/// For each segment allocation the matching budgets are the active,
/// non-deleted ones whose date range contains the expense date and that
/// are scoped either to the allocation's segment or to the department
/// that segment maps to. An allocation with no matching budget is simply
/// not tracked; this soft-fail is deliberate and logged at debug level.
///
/// Budget updates go through the repository's optimistic version check.
/// A conflict surfaces as `ConcurrentModification` for the caller to
/// retry; nothing is retried here. The budget cache entry is invalidated
/// in the same operation as the mutation.
pub struct BudgetConsumptionTracker {
    budgets: Arc<dyn BudgetRepository>,
    directory: Arc<dyn Directory>,
    cache: Arc<dyn Cache>,
}

impl BudgetConsumptionTracker {
    pub fn new(
        budgets: Arc<dyn BudgetRepository>,
        directory: Arc<dyn Directory>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            budgets,
            directory,
            cache,
        }
    }

    /// Adds each allocation amount to its matching budgets.
    ///
    /// Invoked exactly once, when an expense transitions to Approved.
    pub async fn apply(&self, expense: &Expense) -> Result<(), BudgetError> {
        self.track(expense, Direction::Apply).await
    }

    /// Subtracts each allocation amount from its matching budgets,
    /// flooring consumption at zero. Used when an approved expense is
    /// later voided.
    pub async fn reverse(&self, expense: &Expense) -> Result<(), BudgetError> {
        self.track(expense, Direction::Reverse).await
    }

    async fn track(&self, expense: &Expense, direction: Direction) -> Result<(), BudgetError> {
        for allocation in &expense.allocations {
            let matching = self
                .matching_budgets(allocation.segment_id, expense)
                .await?;

            if matching.is_empty() {
                tracing::debug!(
                    expense_id = %expense.id,
                    segment_id = %allocation.segment_id,
                    "no active budget matches allocation; amount not tracked"
                );
                continue;
            }

            for mut budget in matching.into_values() {
                match direction {
                    Direction::Apply => budget.add_consumption(allocation.amount),
                    Direction::Reverse => budget.reduce_consumption(allocation.amount),
                }
                self.persist(&budget).await?;
            }
        }
        Ok(())
    }

    /// Collects segment-scoped and department-scoped matches, deduped by
    /// budget id so a budget scoped to both is only charged once.
    async fn matching_budgets(
        &self,
        segment_id: SegmentId,
        expense: &Expense,
    ) -> Result<HashMap<BudgetId, Budget>, BudgetError> {
        let mut matching: HashMap<BudgetId, Budget> = HashMap::new();

        for budget in self
            .budgets
            .find_active_for_segment_on(segment_id, expense.expense_date)
            .await?
        {
            matching.insert(budget.id, budget);
        }

        if let Some(department_id) = self.directory.segment_department(segment_id).await? {
            for budget in self
                .budgets
                .find_active_for_department_on(department_id, expense.expense_date)
                .await?
            {
                matching.entry(budget.id).or_insert(budget);
            }
        }

        Ok(matching)
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

        tracing::info!(
            budget_id = %budget.id,
            consumed = %budget.consumed,
            "budget consumption updated"
        );
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Apply,
    Reverse,
}
