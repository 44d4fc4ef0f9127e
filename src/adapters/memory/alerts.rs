//! In-memory budget alert repository.
//!
//! The conditional insert holds the write lock across the dedup check
//! and the insert, mirroring the single-transaction guarantee of the
//! Postgres adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::budget::BudgetAlert;
use crate::domain::foundation::{AlertId, BudgetId, DomainError, ErrorCode, ThresholdId, Timestamp};
use crate::ports::AlertRepository;

/// In-memory alert store keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryAlertRepository {
    alerts: Arc<RwLock<HashMap<AlertId, BudgetAlert>>>,
}

impl InMemoryAlertRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertRepository for InMemoryAlertRepository {
    async fn insert_if_none_unacknowledged(
        &self,
        alert: &BudgetAlert,
    ) -> Result<bool, DomainError> {
        let mut alerts = self.alerts.write().await;
        let duplicate = alerts.values().any(|a| {
            a.budget_id == alert.budget_id
                && a.threshold_id == alert.threshold_id
                && !a.acknowledged
        });
        if duplicate {
            return Ok(false);
        }
        alerts.insert(alert.id, alert.clone());
        Ok(true)
    }

    async fn update(&self, alert: &BudgetAlert) -> Result<(), DomainError> {
        let mut alerts = self.alerts.write().await;
        if !alerts.contains_key(&alert.id) {
            return Err(DomainError::new(
                ErrorCode::AlertNotFound,
                format!("Alert not found: {}", alert.id),
            ));
        }
        alerts.insert(alert.id, alert.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AlertId) -> Result<Option<BudgetAlert>, DomainError> {
        Ok(self.alerts.read().await.get(&id).cloned())
    }

    async fn unacknowledged_exists(
        &self,
        budget_id: BudgetId,
        threshold_id: ThresholdId,
    ) -> Result<bool, DomainError> {
        Ok(self.alerts.read().await.values().any(|a| {
            a.budget_id == budget_id && a.threshold_id == threshold_id && !a.acknowledged
        }))
    }

    async fn find_unacknowledged(&self) -> Result<Vec<BudgetAlert>, DomainError> {
        let mut alerts: Vec<_> = self
            .alerts
            .read()
            .await
            .values()
            .filter(|a| !a.acknowledged)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.triggered_date.cmp(&a.triggered_date));
        Ok(alerts)
    }

    async fn find_by_budget(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<BudgetAlert>, DomainError> {
        let mut alerts: Vec<_> = self
            .alerts
            .read()
            .await
            .values()
            .filter(|a| a.budget_id == budget_id)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.triggered_date.cmp(&a.triggered_date));
        Ok(alerts)
    }

    async fn find_triggered_since(
        &self,
        since: Timestamp,
    ) -> Result<Vec<BudgetAlert>, DomainError> {
        Ok(self
            .alerts
            .read()
            .await
            .values()
            .filter(|a| a.triggered_date >= since)
            .cloned()
            .collect())
    }

    async fn delete_acknowledged(&self) -> Result<u64, DomainError> {
        let mut alerts = self.alerts.write().await;
        let before = alerts.len();
        alerts.retain(|_, a| !a.acknowledged);
        Ok((before - alerts.len()) as u64)
    }

    async fn delete_triggered_before(&self, before: Timestamp) -> Result<u64, DomainError> {
        let mut alerts = self.alerts.write().await;
        let count = alerts.len();
        alerts.retain(|_, a| a.triggered_date >= before);
        Ok((count - alerts.len()) as u64)
    }
}
