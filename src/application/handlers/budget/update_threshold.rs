//! UpdateThresholdHandler - edits a threshold's percentage, flag, and
//! recipients.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::budget::{BudgetError, BudgetThreshold};
use crate::domain::foundation::{Percentage, ThresholdId, UserId};
use crate::ports::{Directory, ThresholdRepository};

/// Command to update a threshold.
#[derive(Debug, Clone)]
pub struct UpdateThresholdCommand {
    pub threshold_id: ThresholdId,
    pub percentage: Option<Decimal>,
    pub alert_enabled: Option<bool>,
    pub add_recipient: Option<UserId>,
    pub remove_recipient: Option<UserId>,
}

/// Handler for threshold updates.
pub struct UpdateThresholdHandler {
    thresholds: Arc<dyn ThresholdRepository>,
    directory: Arc<dyn Directory>,
}

impl UpdateThresholdHandler {
    pub fn new(thresholds: Arc<dyn ThresholdRepository>, directory: Arc<dyn Directory>) -> Self {
        Self {
            thresholds,
            directory,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateThresholdCommand,
    ) -> Result<BudgetThreshold, BudgetError> {
        let mut threshold = self
            .thresholds
            .find_by_id(cmd.threshold_id)
            .await?
            .ok_or(BudgetError::ThresholdNotFound(cmd.threshold_id))?;

        if let Some(value) = cmd.percentage {
            threshold.percentage = Percentage::try_new(value)
                .map_err(|_| BudgetError::PercentageOutOfRange { value })?;
        }
        if let Some(enabled) = cmd.alert_enabled {
            if enabled {
                threshold.enable();
            } else {
                threshold.disable();
            }
        }
        if let Some(user) = cmd.add_recipient {
            if !self.directory.user_exists(user).await? {
                return Err(BudgetError::UserNotFound(user));
            }
            threshold.add_recipient(user);
        }
        if let Some(user) = cmd.remove_recipient {
            threshold.remove_recipient(user);
        }

        self.thresholds.update(&threshold).await?;
        tracing::info!(threshold_id = %threshold.id, "threshold updated");
        Ok(threshold)
    }
}
