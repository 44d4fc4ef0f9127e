//! In-memory budget threshold repository.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::budget::BudgetThreshold;
use crate::domain::foundation::{BudgetId, DomainError, ErrorCode, ThresholdId};
use crate::ports::ThresholdRepository;

/// In-memory threshold store keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryThresholdRepository {
    thresholds: Arc<RwLock<HashMap<ThresholdId, BudgetThreshold>>>,
}

impl InMemoryThresholdRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThresholdRepository for InMemoryThresholdRepository {
    async fn insert(&self, threshold: &BudgetThreshold) -> Result<(), DomainError> {
        self.thresholds
            .write()
            .await
            .insert(threshold.id, threshold.clone());
        Ok(())
    }

    async fn update(&self, threshold: &BudgetThreshold) -> Result<(), DomainError> {
        let mut thresholds = self.thresholds.write().await;
        if !thresholds.contains_key(&threshold.id) {
            return Err(DomainError::new(
                ErrorCode::ThresholdNotFound,
                format!("Threshold not found: {}", threshold.id),
            ));
        }
        thresholds.insert(threshold.id, threshold.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ThresholdId,
    ) -> Result<Option<BudgetThreshold>, DomainError> {
        Ok(self.thresholds.read().await.get(&id).cloned())
    }

    async fn find_by_budget(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<BudgetThreshold>, DomainError> {
        Ok(self
            .thresholds
            .read()
            .await
            .values()
            .filter(|t| t.budget_id == budget_id)
            .cloned()
            .collect())
    }

    async fn find_enabled(&self) -> Result<Vec<BudgetThreshold>, DomainError> {
        Ok(self
            .thresholds
            .read()
            .await
            .values()
            .filter(|t| t.alert_enabled)
            .cloned()
            .collect())
    }

    async fn exists_by_budget_and_percentage(
        &self,
        budget_id: BudgetId,
        percentage: Decimal,
    ) -> Result<bool, DomainError> {
        Ok(self
            .thresholds
            .read()
            .await
            .values()
            .any(|t| t.budget_id == budget_id && t.percentage.value() == percentage))
    }

    async fn delete(&self, id: ThresholdId) -> Result<(), DomainError> {
        self.thresholds.write().await.remove(&id);
        Ok(())
    }
}
