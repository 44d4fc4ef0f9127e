//! CreateThresholdHandler - attaches an alert threshold to a budget.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::budget::{BudgetError, BudgetThreshold};
use crate::domain::foundation::{BudgetId, Percentage, UserId};
use crate::ports::{BudgetRepository, Directory, ThresholdRepository};

/// Command to create a threshold.
#[derive(Debug, Clone)]
pub struct CreateThresholdCommand {
    pub budget_id: BudgetId,
    pub percentage: Decimal,
    pub alert_enabled: bool,
    pub notification_recipients: Vec<UserId>,
}

/// Handler for threshold creation.
pub struct CreateThresholdHandler {
    thresholds: Arc<dyn ThresholdRepository>,
    budgets: Arc<dyn BudgetRepository>,
    directory: Arc<dyn Directory>,
}

impl CreateThresholdHandler {
    pub fn new(
        thresholds: Arc<dyn ThresholdRepository>,
        budgets: Arc<dyn BudgetRepository>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            thresholds,
            budgets,
            directory,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateThresholdCommand,
    ) -> Result<BudgetThreshold, BudgetError> {
        let percentage = Percentage::try_new(cmd.percentage).map_err(|_| {
            BudgetError::PercentageOutOfRange {
                value: cmd.percentage,
            }
        })?;

        if self.budgets.find_by_id(cmd.budget_id).await?.is_none() {
            return Err(BudgetError::NotFound(cmd.budget_id));
        }

        if self
            .thresholds
            .exists_by_budget_and_percentage(cmd.budget_id, cmd.percentage)
            .await?
        {
            return Err(BudgetError::DuplicateThreshold {
                percentage: cmd.percentage,
            });
        }

        let mut threshold = BudgetThreshold::create(cmd.budget_id, percentage);
        if !cmd.alert_enabled {
            threshold.disable();
        }
        for recipient in cmd.notification_recipients {
            if !self.directory.user_exists(recipient).await? {
                return Err(BudgetError::UserNotFound(recipient));
            }
            threshold.add_recipient(recipient);
        }

        self.thresholds.insert(&threshold).await?;
        tracing::info!(
            threshold_id = %threshold.id,
            budget_id = %cmd.budget_id,
            percentage = %threshold.percentage,
            "threshold created"
        );
        Ok(threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryBudgetRepository, InMemoryDirectory, InMemoryThresholdRepository,
    };
    use crate::domain::budget::{Budget, BudgetPeriod};
    use crate::domain::foundation::Money;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    struct Fixture {
        thresholds: Arc<InMemoryThresholdRepository>,
        budgets: Arc<InMemoryBudgetRepository>,
        directory: Arc<InMemoryDirectory>,
        handler: CreateThresholdHandler,
    }

    fn fixture() -> Fixture {
        let thresholds = Arc::new(InMemoryThresholdRepository::new());
        let budgets = Arc::new(InMemoryBudgetRepository::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let handler = CreateThresholdHandler::new(
            thresholds.clone(),
            budgets.clone(),
            directory.clone(),
        );
        Fixture {
            thresholds,
            budgets,
            directory,
            handler,
        }
    }

    async fn seeded_budget(fixture: &Fixture) -> Budget {
        let budget = Budget::create(
            "Engineering Q3".to_string(),
            None,
            None,
            BudgetPeriod::Quarterly,
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            Money::try_new(dec!(50000.00)).unwrap(),
        )
        .unwrap();
        fixture.budgets.insert(&budget).await.unwrap();
        budget
    }

    fn command(budget_id: BudgetId, percentage: Decimal) -> CreateThresholdCommand {
        CreateThresholdCommand {
            budget_id,
            percentage,
            alert_enabled: true,
            notification_recipients: vec![],
        }
    }

    #[tokio::test]
    async fn creates_enabled_threshold() {
        let fixture = fixture();
        let budget = seeded_budget(&fixture).await;

        let threshold = fixture
            .handler
            .handle(command(budget.id, dec!(80)))
            .await
            .unwrap();

        assert!(threshold.alert_enabled);
        assert_eq!(threshold.percentage.value(), dec!(80));
        assert_eq!(fixture.thresholds.find_enabled().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_percentage_above_100() {
        let fixture = fixture();
        let budget = seeded_budget(&fixture).await;

        let result = fixture.handler.handle(command(budget.id, dec!(100.5))).await;
        assert!(matches!(
            result,
            Err(BudgetError::PercentageOutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn rejects_duplicate_percentage_for_budget() {
        let fixture = fixture();
        let budget = seeded_budget(&fixture).await;
        fixture
            .handler
            .handle(command(budget.id, dec!(80)))
            .await
            .unwrap();

        let result = fixture.handler.handle(command(budget.id, dec!(80))).await;
        assert!(matches!(result, Err(BudgetError::DuplicateThreshold { .. })));
    }

    #[tokio::test]
    async fn rejects_unknown_budget() {
        let fixture = fixture();
        let result = fixture.handler.handle(command(BudgetId::new(), dec!(80))).await;
        assert!(matches!(result, Err(BudgetError::NotFound(_))));
    }

    #[tokio::test]
    async fn rejects_unknown_recipient() {
        let fixture = fixture();
        let budget = seeded_budget(&fixture).await;

        let mut cmd = command(budget.id, dec!(80));
        cmd.notification_recipients = vec![UserId::new()];

        let result = fixture.handler.handle(cmd).await;
        assert!(matches!(result, Err(BudgetError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn registers_known_recipients() {
        let fixture = fixture();
        let budget = seeded_budget(&fixture).await;
        let user = UserId::new();
        fixture.directory.register_user(user).await;

        let mut cmd = command(budget.id, dec!(90));
        cmd.notification_recipients = vec![user];

        let threshold = fixture.handler.handle(cmd).await.unwrap();
        assert_eq!(threshold.notification_recipients, vec![user]);
    }
}
