//! SubmitExpenseHandler - moves a Draft expense into approval.

use chrono::Utc;
use std::sync::Arc;

use crate::domain::expense::{Expense, ExpenseError};
use crate::domain::foundation::{ExpenseId, UserId};
use crate::domain::workflow::WorkflowHistory;
use crate::ports::{ExpenseRepository, WorkflowHistoryRepository};

/// Command to submit a draft expense for approval.
#[derive(Debug, Clone)]
pub struct SubmitExpenseCommand {
    pub actor: UserId,
    pub expense_id: ExpenseId,
}

/// Handler for expense submission.
pub struct SubmitExpenseHandler {
    expenses: Arc<dyn ExpenseRepository>,
    history: Arc<dyn WorkflowHistoryRepository>,
}

impl SubmitExpenseHandler {
    pub fn new(
        expenses: Arc<dyn ExpenseRepository>,
        history: Arc<dyn WorkflowHistoryRepository>,
    ) -> Self {
        Self { expenses, history }
    }

    pub async fn handle(&self, cmd: SubmitExpenseCommand) -> Result<Expense, ExpenseError> {
        let mut expense = self
            .expenses
            .find_by_id(cmd.expense_id)
            .await?
            .ok_or(ExpenseError::NotFound(cmd.expense_id))?;

        let from = expense.status;
        expense.submit(Utc::now().date_naive())?;

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

        tracing::info!(expense_id = %expense.id, "expense submitted");
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

    fn draft_expense() -> Expense {
        let total = Money::try_new(dec!(1000.00)).unwrap();
        let allocations = validate_allocations(
            total,
            &[AllocationRequest {
                segment_id: SegmentId::new(),
                percentage: dec!(100),
                description: None,
            }],
        )
        .unwrap();
        Expense::create(
            UserId::new(),
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            None,
            total,
            "USD".to_string(),
            None,
            allocations,
            vec![],
        )
    }

    fn handler(
        expenses: Arc<InMemoryExpenseRepository>,
        history: Arc<InMemoryHistoryRepository>,
    ) -> SubmitExpenseHandler {
        SubmitExpenseHandler::new(expenses, history)
    }

    #[tokio::test]
    async fn submit_sets_status_date_and_history() {
        let expenses = Arc::new(InMemoryExpenseRepository::new());
        let history = Arc::new(InMemoryHistoryRepository::new());
        let expense = draft_expense();
        expenses.insert(&expense).await.unwrap();
        let actor = UserId::new();

        let submitted = handler(expenses.clone(), history.clone())
            .handle(SubmitExpenseCommand {
                actor,
                expense_id: expense.id,
            })
            .await
            .unwrap();

        assert_eq!(submitted.status, ExpenseStatus::Submitted);
        assert!(submitted.submission_date.is_some());

        let rows = history.find_by_expense(expense.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].from_status, Some(ExpenseStatus::Draft));
        assert_eq!(rows[0].to_status, ExpenseStatus::Submitted);

        let stored = expenses.find_by_id(expense.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ExpenseStatus::Submitted);
    }

    #[tokio::test]
    async fn submit_unknown_expense_fails() {
        let expenses = Arc::new(InMemoryExpenseRepository::new());
        let history = Arc::new(InMemoryHistoryRepository::new());

        let result = handler(expenses, history)
            .handle(SubmitExpenseCommand {
                actor: UserId::new(),
                expense_id: ExpenseId::new(),
            })
            .await;

        assert!(matches!(result, Err(ExpenseError::NotFound(_))));
    }

    #[tokio::test]
    async fn submit_already_submitted_fails_without_history() {
        let expenses = Arc::new(InMemoryExpenseRepository::new());
        let history = Arc::new(InMemoryHistoryRepository::new());
        let mut expense = draft_expense();
        expense
            .submit(NaiveDate::from_ymd_opt(2026, 7, 2).unwrap())
            .unwrap();
        expenses.insert(&expense).await.unwrap();

        let result = handler(expenses, history.clone())
            .handle(SubmitExpenseCommand {
                actor: UserId::new(),
                expense_id: expense.id,
            })
            .await;

        assert!(matches!(
            result,
            Err(ExpenseError::InvalidTransition { .. })
        ));
        assert!(history.find_by_expense(expense.id).await.unwrap().is_empty());
    }
}
