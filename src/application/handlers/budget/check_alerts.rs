//! CheckAlertsHandler - the periodic threshold sweep.

use std::sync::Arc;

use crate::domain::budget::{BudgetAlert, BudgetError};
use crate::ports::{AlertRepository, BudgetRepository, ThresholdRepository};

/// Evaluates every enabled threshold and raises alerts for breaches.
///
/// Safe to call repeatedly, including from a periodic scheduler and
/// concurrently: the conditional insert suppresses a second alert while
/// an unacknowledged one exists for the same (budget, threshold) pair.
pub struct CheckAlertsHandler {
    thresholds: Arc<dyn ThresholdRepository>,
    budgets: Arc<dyn BudgetRepository>,
    alerts: Arc<dyn AlertRepository>,
}

impl CheckAlertsHandler {
    pub fn new(
        thresholds: Arc<dyn ThresholdRepository>,
        budgets: Arc<dyn BudgetRepository>,
        alerts: Arc<dyn AlertRepository>,
    ) -> Self {
        Self {
            thresholds,
            budgets,
            alerts,
        }
    }

    /// Returns the number of alerts created by this sweep.
    pub async fn handle(&self) -> Result<u32, BudgetError> {
        let mut created = 0;

        for threshold in self.thresholds.find_enabled().await? {
            // A threshold whose budget is gone or soft-deleted is skipped.
            let Some(budget) = self.budgets.find_by_id(threshold.budget_id).await? else {
                continue;
            };

            if !threshold.is_breached(&budget) {
                continue;
            }

            let alert = BudgetAlert::raise(budget.id, threshold.id, threshold.alert_message());
            if self.alerts.insert_if_none_unacknowledged(&alert).await? {
                created += 1;
                tracing::info!(
                    budget_id = %budget.id,
                    threshold_id = %threshold.id,
                    utilization = %budget.utilization(),
                    "budget alert raised"
                );
            }
        }

        Ok(created)
    }
}
