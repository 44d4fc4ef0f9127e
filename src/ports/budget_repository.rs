//! Budget repository port.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::budget::{Budget, BudgetPeriod};
use crate::domain::foundation::{BudgetId, DepartmentId, DomainError, SegmentId};

/// Repository port for Budget aggregate persistence.
///
/// Updates use optimistic concurrency: the stored row's version must
/// match the aggregate's `meta.version` or the update fails with
/// `ConcurrentModification`. On success the stored version advances by
/// one; callers reload before retrying.
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    /// Persists a new budget.
    async fn insert(&self, budget: &Budget) -> Result<(), DomainError>;

    /// Updates a budget with a version check.
    ///
    /// # Errors
    ///
    /// - `BudgetNotFound` if the budget does not exist
    /// - `ConcurrentModification` if the stored version does not match
    async fn update(&self, budget: &Budget) -> Result<(), DomainError>;

    /// Finds a non-deleted budget by id.
    async fn find_by_id(&self, id: BudgetId) -> Result<Option<Budget>, DomainError>;

    /// Returns true if a non-deleted budget with the same name, period,
    /// and date range exists.
    async fn exists_by_name_period_range(
        &self,
        name: &str,
        period: BudgetPeriod,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<bool, DomainError>;

    /// Lists active, non-deleted budgets scoped to a segment whose date
    /// range contains the given date.
    async fn find_active_for_segment_on(
        &self,
        segment_id: SegmentId,
        date: NaiveDate,
    ) -> Result<Vec<Budget>, DomainError>;

    /// Lists active, non-deleted budgets scoped to a department whose
    /// date range contains the given date.
    async fn find_active_for_department_on(
        &self,
        department_id: DepartmentId,
        date: NaiveDate,
    ) -> Result<Vec<Budget>, DomainError>;

    /// Lists non-deleted budgets whose date range contains the date.
    async fn find_current(&self, date: NaiveDate) -> Result<Vec<Budget>, DomainError>;

    /// Lists active, non-deleted budgets.
    async fn list_active(&self) -> Result<Vec<Budget>, DomainError>;

    /// Lists all non-deleted budgets.
    async fn list(&self) -> Result<Vec<Budget>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn BudgetRepository) {}
    }
}
