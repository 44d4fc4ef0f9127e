//! PurgeAlertsHandler - bulk alert cleanup.

use std::sync::Arc;

use crate::domain::budget::BudgetError;
use crate::domain::foundation::Timestamp;
use crate::ports::AlertRepository;

/// Bulk, unconditional alert deletes. Not part of the deduplication
/// invariant; provided to complete the alert lifecycle.
pub struct PurgeAlertsHandler {
    alerts: Arc<dyn AlertRepository>,
}

impl PurgeAlertsHandler {
    pub fn new(alerts: Arc<dyn AlertRepository>) -> Self {
        Self { alerts }
    }

    /// Deletes all acknowledged alerts, returning the count removed.
    pub async fn delete_acknowledged(&self) -> Result<u64, BudgetError> {
        let removed = self.alerts.delete_acknowledged().await?;
        tracing::info!(removed, "acknowledged alerts purged");
        Ok(removed)
    }

    /// Deletes alerts triggered more than `days` days ago, returning the
    /// count removed.
    pub async fn delete_older_than(&self, days: i64) -> Result<u64, BudgetError> {
        let before = Timestamp::now().minus_days(days);
        let removed = self.alerts.delete_triggered_before(before).await?;
        tracing::info!(removed, days, "old alerts purged");
        Ok(removed)
    }
}
