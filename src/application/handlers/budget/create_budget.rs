//! CreateBudgetHandler - creates a budget with scope and range checks.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::budget::{Budget, BudgetError, BudgetPeriod};
use crate::domain::foundation::{DepartmentId, Money, SegmentId};
use crate::ports::{BudgetRepository, Directory};

/// Command to create a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetCommand {
    pub name: String,
    pub segment_id: Option<SegmentId>,
    pub department_id: Option<DepartmentId>,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub allocated_amount: Decimal,
}

/// Handler for budget creation.
pub struct CreateBudgetHandler {
    budgets: Arc<dyn BudgetRepository>,
    directory: Arc<dyn Directory>,
}

impl CreateBudgetHandler {
    pub fn new(budgets: Arc<dyn BudgetRepository>, directory: Arc<dyn Directory>) -> Self {
        Self { budgets, directory }
    }

    pub async fn handle(&self, cmd: CreateBudgetCommand) -> Result<Budget, BudgetError> {
        if self
            .budgets
            .exists_by_name_period_range(&cmd.name, cmd.period, cmd.start_date, cmd.end_date)
            .await?
        {
            return Err(BudgetError::duplicate_name(cmd.name));
        }

        if let Some(segment) = cmd.segment_id {
            if !self.directory.segment_exists(segment).await? {
                return Err(BudgetError::SegmentNotFound(segment));
            }
        }
        if let Some(department) = cmd.department_id {
            if !self.directory.department_exists(department).await? {
                return Err(BudgetError::DepartmentNotFound(department));
            }
        }

        let allocated = Money::try_new(cmd.allocated_amount)
            .map_err(|e| BudgetError::validation("allocated_amount", e.to_string()))?;

        let budget = Budget::create(
            cmd.name,
            cmd.segment_id,
            cmd.department_id,
            cmd.period,
            cmd.start_date,
            cmd.end_date,
            allocated,
        )?;

        self.budgets.insert(&budget).await?;
        tracing::info!(budget_id = %budget.id, name = %budget.name, "budget created");
        Ok(budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryBudgetRepository, InMemoryDirectory};
    use rust_decimal_macros::dec;

    struct Fixture {
        budgets: Arc<InMemoryBudgetRepository>,
        directory: Arc<InMemoryDirectory>,
        handler: CreateBudgetHandler,
    }

    fn fixture() -> Fixture {
        let budgets = Arc::new(InMemoryBudgetRepository::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let handler = CreateBudgetHandler::new(budgets.clone(), directory.clone());
        Fixture {
            budgets,
            directory,
            handler,
        }
    }

    fn command(name: &str) -> CreateBudgetCommand {
        CreateBudgetCommand {
            name: name.to_string(),
            segment_id: None,
            department_id: None,
            period: BudgetPeriod::Quarterly,
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            allocated_amount: dec!(50000.00),
        }
    }

    #[tokio::test]
    async fn creates_active_budget_with_zero_consumption() {
        let fixture = fixture();
        let budget = fixture.handler.handle(command("Engineering Q3")).await.unwrap();

        assert!(budget.is_active);
        assert_eq!(budget.consumed.amount(), dec!(0));
        assert!(fixture
            .budgets
            .find_by_id(budget.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn rejects_duplicate_name_period_range() {
        let fixture = fixture();
        fixture.handler.handle(command("Engineering Q3")).await.unwrap();

        let result = fixture.handler.handle(command("Engineering Q3")).await;
        assert!(matches!(result, Err(BudgetError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn same_name_different_range_is_allowed() {
        let fixture = fixture();
        fixture.handler.handle(command("Engineering")).await.unwrap();

        let mut q4 = command("Engineering");
        q4.start_date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        q4.end_date = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert!(fixture.handler.handle(q4).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_inverted_date_range() {
        let fixture = fixture();
        let mut cmd = command("Engineering Q3");
        cmd.end_date = cmd.start_date;

        let result = fixture.handler.handle(cmd).await;
        assert!(matches!(result, Err(BudgetError::InvalidDateRange)));
    }

    #[tokio::test]
    async fn rejects_unknown_segment_scope() {
        let fixture = fixture();
        let mut cmd = command("Engineering Q3");
        cmd.segment_id = Some(SegmentId::new());

        let result = fixture.handler.handle(cmd).await;
        assert!(matches!(result, Err(BudgetError::SegmentNotFound(_))));
    }

    #[tokio::test]
    async fn accepts_registered_scope() {
        let fixture = fixture();
        let segment = SegmentId::new();
        let department = DepartmentId::new();
        fixture
            .directory
            .register_segment(segment, Some(department))
            .await;

        let mut cmd = command("Engineering Q3");
        cmd.segment_id = Some(segment);
        cmd.department_id = Some(department);

        let budget = fixture.handler.handle(cmd).await.unwrap();
        assert_eq!(budget.segment_id, Some(segment));
        assert_eq!(budget.department_id, Some(department));
    }
}
