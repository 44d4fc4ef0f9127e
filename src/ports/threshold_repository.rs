//! Budget threshold repository port.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::budget::BudgetThreshold;
use crate::domain::foundation::{BudgetId, DomainError, ThresholdId};

/// Repository port for BudgetThreshold persistence.
#[async_trait]
pub trait ThresholdRepository: Send + Sync {
    /// Persists a new threshold.
    async fn insert(&self, threshold: &BudgetThreshold) -> Result<(), DomainError>;

    /// Updates an existing threshold.
    async fn update(&self, threshold: &BudgetThreshold) -> Result<(), DomainError>;

    /// Finds a threshold by id.
    async fn find_by_id(&self, id: ThresholdId) -> Result<Option<BudgetThreshold>, DomainError>;

    /// Lists thresholds watching a budget.
    async fn find_by_budget(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<BudgetThreshold>, DomainError>;

    /// Lists thresholds with alerting enabled.
    async fn find_enabled(&self) -> Result<Vec<BudgetThreshold>, DomainError>;

    /// Returns true if the budget already has a threshold at the given
    /// percentage.
    async fn exists_by_budget_and_percentage(
        &self,
        budget_id: BudgetId,
        percentage: Decimal,
    ) -> Result<bool, DomainError>;

    /// Deletes a threshold.
    async fn delete(&self, id: ThresholdId) -> Result<(), DomainError>;
}
