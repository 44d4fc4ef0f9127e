//! AcknowledgeAlertHandler - one-way alert acknowledgment.

use std::sync::Arc;

use crate::domain::budget::{BudgetAlert, BudgetError};
use crate::domain::foundation::AlertId;
use crate::ports::AlertRepository;

/// Command to acknowledge an alert.
#[derive(Debug, Clone)]
pub struct AcknowledgeAlertCommand {
    pub alert_id: AlertId,
}

/// Handler for alert acknowledgment. Acknowledging an already
/// acknowledged alert is a no-op; the original date is kept.
pub struct AcknowledgeAlertHandler {
    alerts: Arc<dyn AlertRepository>,
}

impl AcknowledgeAlertHandler {
    pub fn new(alerts: Arc<dyn AlertRepository>) -> Self {
        Self { alerts }
    }

    pub async fn handle(&self, cmd: AcknowledgeAlertCommand) -> Result<BudgetAlert, BudgetError> {
        let mut alert = self
            .alerts
            .find_by_id(cmd.alert_id)
            .await?
            .ok_or(BudgetError::AlertNotFound(cmd.alert_id))?;

        alert.acknowledge();
        self.alerts.update(&alert).await?;

        tracing::info!(alert_id = %alert.id, "alert acknowledged");
        Ok(alert)
    }
}
