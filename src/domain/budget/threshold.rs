//! Budget thresholds - utilization levels at which alerts fire.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BudgetId, Percentage, RecordMetadata, ThresholdId, UserId};

use super::Budget;

/// A utilization percentage at which an alert should fire for a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetThreshold {
    /// Unique identifier for this threshold.
    pub id: ThresholdId,

    /// Budget this threshold watches.
    pub budget_id: BudgetId,

    /// Utilization percentage that triggers the alert.
    pub percentage: Percentage,

    /// Whether alerting is enabled for this threshold.
    pub alert_enabled: bool,

    /// Users to notify when the alert fires.
    pub notification_recipients: Vec<UserId>,

    /// Audit and optimistic-lock metadata.
    pub meta: RecordMetadata,
}

impl BudgetThreshold {
    /// Creates a new enabled threshold.
    pub fn create(budget_id: BudgetId, percentage: Percentage) -> Self {
        Self {
            id: ThresholdId::new(),
            budget_id,
            percentage,
            alert_enabled: true,
            notification_recipients: Vec::new(),
            meta: RecordMetadata::new(),
        }
    }

    /// Returns true iff the budget's utilization has reached this
    /// threshold. The boundary counts: exactly equal is breached.
    pub fn is_breached(&self, budget: &Budget) -> bool {
        budget.utilization() >= self.percentage.value()
    }

    /// The message recorded on an alert raised for this threshold.
    pub fn alert_message(&self) -> String {
        format!(
            "Budget threshold of {}% has been reached",
            self.percentage.value()
        )
    }

    /// Adds a notification recipient; duplicates are ignored.
    pub fn add_recipient(&mut self, user: UserId) {
        if !self.notification_recipients.contains(&user) {
            self.notification_recipients.push(user);
            self.meta.touch();
        }
    }

    /// Removes a notification recipient if present.
    pub fn remove_recipient(&mut self, user: UserId) {
        self.notification_recipients.retain(|u| *u != user);
        self.meta.touch();
    }

    /// Enables alerting.
    pub fn enable(&mut self) {
        self.alert_enabled = true;
        self.meta.touch();
    }

    /// Disables alerting.
    pub fn disable(&mut self) {
        self.alert_enabled = false;
        self.meta.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::budget::BudgetPeriod;
    use crate::domain::foundation::Money;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn budget_with(allocated: rust_decimal::Decimal, consumed: rust_decimal::Decimal) -> Budget {
        let mut budget = Budget::create(
            "Marketing FY26".to_string(),
            None,
            None,
            BudgetPeriod::Yearly,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            Money::try_new(allocated).unwrap(),
        )
        .unwrap();
        budget.add_consumption(Money::try_new(consumed).unwrap());
        budget
    }

    fn threshold(budget: &Budget, pct: rust_decimal::Decimal) -> BudgetThreshold {
        BudgetThreshold::create(budget.id, Percentage::try_new(pct).unwrap())
    }

    #[test]
    fn breached_above_threshold() {
        let budget = budget_with(dec!(50000.00), dec!(41000.00));
        assert!(threshold(&budget, dec!(80)).is_breached(&budget));
    }

    #[test]
    fn not_breached_below_threshold() {
        let budget = budget_with(dec!(50000.00), dec!(30000.00));
        assert!(!threshold(&budget, dec!(80)).is_breached(&budget));
    }

    #[test]
    fn exactly_equal_counts_as_breached() {
        let budget = budget_with(dec!(1000.00), dec!(800.00));
        assert!(threshold(&budget, dec!(80)).is_breached(&budget));
    }

    #[test]
    fn zero_allocation_only_breaches_zero_threshold() {
        let budget = budget_with(dec!(0), dec!(0));
        assert!(threshold(&budget, dec!(0)).is_breached(&budget));
        assert!(!threshold(&budget, dec!(1)).is_breached(&budget));
    }

    #[test]
    fn alert_message_names_the_percentage() {
        let budget = budget_with(dec!(100), dec!(0));
        assert_eq!(
            threshold(&budget, dec!(80)).alert_message(),
            "Budget threshold of 80% has been reached"
        );
    }

    #[test]
    fn recipients_deduplicate() {
        let budget = budget_with(dec!(100), dec!(0));
        let mut t = threshold(&budget, dec!(80));
        let user = UserId::new();
        t.add_recipient(user);
        t.add_recipient(user);
        assert_eq!(t.notification_recipients.len(), 1);

        t.remove_recipient(user);
        assert!(t.notification_recipients.is_empty());
    }

    #[test]
    fn enable_disable_toggles_flag() {
        let budget = budget_with(dec!(100), dec!(0));
        let mut t = threshold(&budget, dec!(80));
        t.disable();
        assert!(!t.alert_enabled);
        t.enable();
        assert!(t.alert_enabled);
    }
}
