//! PayExpenseHandler - marks an approved expense as paid.

use chrono::Utc;
use std::sync::Arc;

use crate::domain::expense::{Expense, ExpenseError};
use crate::domain::foundation::{ExpenseId, UserId};
use crate::domain::workflow::WorkflowHistory;
use crate::ports::{ExpenseRepository, WorkflowHistoryRepository};

/// Command to mark an approved expense as paid.
#[derive(Debug, Clone)]
pub struct PayExpenseCommand {
    pub actor: UserId,
    pub expense_id: ExpenseId,
    pub payment_reference: Option<String>,
}

/// Handler for expense payment.
pub struct PayExpenseHandler {
    expenses: Arc<dyn ExpenseRepository>,
    history: Arc<dyn WorkflowHistoryRepository>,
}

impl PayExpenseHandler {
    pub fn new(
        expenses: Arc<dyn ExpenseRepository>,
        history: Arc<dyn WorkflowHistoryRepository>,
    ) -> Self {
        Self { expenses, history }
    }

    pub async fn handle(&self, cmd: PayExpenseCommand) -> Result<Expense, ExpenseError> {
        let mut expense = self
            .expenses
            .find_by_id(cmd.expense_id)
            .await?
            .ok_or(ExpenseError::NotFound(cmd.expense_id))?;

        let from = expense.status;
        expense.mark_paid(Utc::now().date_naive(), cmd.payment_reference)?;

        self.expenses.update(&expense).await?;
        self.history
            .append(&WorkflowHistory::record(
                expense.id,
                Some(from),
                expense.status,
                cmd.actor,
                None,
            ))
            .await?;

        tracing::info!(expense_id = %expense.id, "expense paid");
        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryExpenseRepository, InMemoryHistoryRepository};
    use crate::domain::expense::{validate_allocations, AllocationRequest, ExpenseStatus};
    use crate::domain::foundation::{Money, SegmentId};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn approved_expense() -> Expense {
        let total = Money::try_new(dec!(400.00)).unwrap();
        let allocations = validate_allocations(
            total,
            &[AllocationRequest {
                segment_id: SegmentId::new(),
                percentage: dec!(100),
                description: None,
            }],
        )
        .unwrap();
        let mut expense = Expense::create(
            UserId::new(),
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            None,
            total,
            "USD".to_string(),
            None,
            allocations,
            vec![],
        );
        expense
            .submit(NaiveDate::from_ymd_opt(2026, 7, 2).unwrap())
            .unwrap();
        expense
            .approve(NaiveDate::from_ymd_opt(2026, 7, 3).unwrap())
            .unwrap();
        expense
    }

    #[tokio::test]
    async fn pay_sets_status_and_reference() {
        let expenses = Arc::new(InMemoryExpenseRepository::new());
        let history = Arc::new(InMemoryHistoryRepository::new());
        let expense = approved_expense();
        expenses.insert(&expense).await.unwrap();

        let paid = PayExpenseHandler::new(expenses, history.clone())
            .handle(PayExpenseCommand {
                actor: UserId::new(),
                expense_id: expense.id,
                payment_reference: Some("PAY-42".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(paid.status, ExpenseStatus::Paid);
        assert_eq!(paid.payment_reference.as_deref(), Some("PAY-42"));

        let rows = history.find_by_expense(expense.id).await.unwrap();
        assert_eq!(rows[0].from_status, Some(ExpenseStatus::Approved));
        assert_eq!(rows[0].to_status, ExpenseStatus::Paid);
    }

    #[tokio::test]
    async fn paying_a_submitted_expense_fails() {
        let expenses = Arc::new(InMemoryExpenseRepository::new());
        let history = Arc::new(InMemoryHistoryRepository::new());
        let mut expense = approved_expense();
        expense.status = ExpenseStatus::Submitted;
        expenses.insert(&expense).await.unwrap();

        let result = PayExpenseHandler::new(expenses, history)
            .handle(PayExpenseCommand {
                actor: UserId::new(),
                expense_id: expense.id,
                payment_reference: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(ExpenseError::InvalidTransition { .. })
        ));
    }
}
