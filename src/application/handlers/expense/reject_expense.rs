//! RejectExpenseHandler - rejects a submitted expense with a reason.

use std::sync::Arc;

use crate::domain::expense::{Expense, ExpenseError};
use crate::domain::foundation::{ExpenseId, UserId};
use crate::domain::workflow::WorkflowHistory;
use crate::ports::{ExpenseRepository, WorkflowHistoryRepository};

/// Command to reject a submitted expense.
#[derive(Debug, Clone)]
pub struct RejectExpenseCommand {
    pub actor: UserId,
    pub expense_id: ExpenseId,
    pub reason: String,
}

/// Handler for expense rejection.
pub struct RejectExpenseHandler {
    expenses: Arc<dyn ExpenseRepository>,
    history: Arc<dyn WorkflowHistoryRepository>,
}

impl RejectExpenseHandler {
    pub fn new(
        expenses: Arc<dyn ExpenseRepository>,
        history: Arc<dyn WorkflowHistoryRepository>,
    ) -> Self {
        Self { expenses, history }
    }

    pub async fn handle(&self, cmd: RejectExpenseCommand) -> Result<Expense, ExpenseError> {
        let mut expense = self
            .expenses
            .find_by_id(cmd.expense_id)
            .await?
            .ok_or(ExpenseError::NotFound(cmd.expense_id))?;

        let from = expense.status;
        expense.reject(cmd.reason.clone())?;

        self.expenses.update(&expense).await?;
        self.history
            .append(&WorkflowHistory::record(
                expense.id,
                Some(from),
                expense.status,
                cmd.actor,
                Some(cmd.reason),
            ))
            .await?;

        tracing::info!(expense_id = %expense.id, "expense rejected");
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

    fn submitted_expense() -> Expense {
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
    }

    #[tokio::test]
    async fn reject_stores_reason_and_history() {
        let expenses = Arc::new(InMemoryExpenseRepository::new());
        let history = Arc::new(InMemoryHistoryRepository::new());
        let expense = submitted_expense();
        expenses.insert(&expense).await.unwrap();

        let rejected = RejectExpenseHandler::new(expenses.clone(), history.clone())
            .handle(RejectExpenseCommand {
                actor: UserId::new(),
                expense_id: expense.id,
                reason: "missing receipt".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(rejected.status, ExpenseStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("missing receipt"));

        let rows = history.find_by_expense(expense.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].to_status, ExpenseStatus::Rejected);
        assert_eq!(rows[0].comment.as_deref(), Some("missing receipt"));
    }

    #[tokio::test]
    async fn rejecting_a_draft_fails() {
        let expenses = Arc::new(InMemoryExpenseRepository::new());
        let history = Arc::new(InMemoryHistoryRepository::new());
        let mut expense = submitted_expense();
        expense.reject("first".to_string()).unwrap();
        expense.revert_to_draft().unwrap();
        expenses.insert(&expense).await.unwrap();

        let result = RejectExpenseHandler::new(expenses, history)
            .handle(RejectExpenseCommand {
                actor: UserId::new(),
                expense_id: expense.id,
                reason: "again".to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(ExpenseError::InvalidTransition { .. })
        ));
    }
}
