//! Budget alert repository port.

use async_trait::async_trait;

use crate::domain::budget::BudgetAlert;
use crate::domain::foundation::{AlertId, BudgetId, DomainError, ThresholdId, Timestamp};

/// Repository port for BudgetAlert persistence.
///
/// The core deduplication invariant lives here: at most one
/// unacknowledged alert per (budget, threshold) pair. The conditional
/// insert performs the existence check and the insert atomically, so
/// concurrent alert sweeps cannot double-raise.
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Inserts the alert unless an unacknowledged alert already exists
    /// for the same (budget, threshold) pair.
    ///
    /// Returns true if the alert was inserted, false if it was
    /// suppressed by the deduplication check.
    async fn insert_if_none_unacknowledged(
        &self,
        alert: &BudgetAlert,
    ) -> Result<bool, DomainError>;

    /// Persists acknowledgment state for an existing alert.
    async fn update(&self, alert: &BudgetAlert) -> Result<(), DomainError>;

    /// Finds an alert by id.
    async fn find_by_id(&self, id: AlertId) -> Result<Option<BudgetAlert>, DomainError>;

    /// Returns true if an unacknowledged alert exists for the pair.
    async fn unacknowledged_exists(
        &self,
        budget_id: BudgetId,
        threshold_id: ThresholdId,
    ) -> Result<bool, DomainError>;

    /// Lists all unacknowledged alerts, most recent first.
    async fn find_unacknowledged(&self) -> Result<Vec<BudgetAlert>, DomainError>;

    /// Lists alerts for a budget, most recent first.
    async fn find_by_budget(&self, budget_id: BudgetId)
        -> Result<Vec<BudgetAlert>, DomainError>;

    /// Lists alerts triggered at or after the given time.
    async fn find_triggered_since(
        &self,
        since: Timestamp,
    ) -> Result<Vec<BudgetAlert>, DomainError>;

    /// Deletes all acknowledged alerts, returning the count removed.
    async fn delete_acknowledged(&self) -> Result<u64, DomainError>;

    /// Deletes alerts triggered before the given time, returning the
    /// count removed.
    async fn delete_triggered_before(&self, before: Timestamp) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AlertRepository) {}
    }
}
