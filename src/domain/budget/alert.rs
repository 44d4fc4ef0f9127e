//! Budget alerts raised when a threshold is breached.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AlertId, BudgetId, ThresholdId, Timestamp};

/// An alert raised for one (budget, threshold) pair.
///
/// At most one unacknowledged alert may exist per pair at any time;
/// the deduplication check lives with the repository insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub id: AlertId,
    pub budget_id: BudgetId,
    pub threshold_id: ThresholdId,
    pub triggered_date: Timestamp,
    pub message: String,
    pub acknowledged: bool,
    pub acknowledged_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl BudgetAlert {
    /// Raises a new, unacknowledged alert.
    pub fn raise(budget_id: BudgetId, threshold_id: ThresholdId, message: String) -> Self {
        let now = Timestamp::now();
        Self {
            id: AlertId::new(),
            budget_id,
            threshold_id,
            triggered_date: now,
            message,
            acknowledged: false,
            acknowledged_date: None,
            created_at: now,
        }
    }

    /// Acknowledges the alert. One-way: acknowledging an already
    /// acknowledged alert is a no-op and keeps the original date.
    pub fn acknowledge(&mut self) {
        if !self.acknowledged {
            self.acknowledged = true;
            self.acknowledged_date = Some(Timestamp::now());
        }
    }
}
