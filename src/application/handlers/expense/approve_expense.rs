//! ApproveExpenseHandler - approves a submitted expense and applies
//! budget consumption.

use chrono::Utc;
use std::sync::Arc;

use crate::application::handlers::budget::BudgetConsumptionTracker;
use crate::domain::budget::BudgetError;
use crate::domain::expense::{Expense, ExpenseError};
use crate::domain::foundation::{ExpenseId, UserId};
use crate::domain::workflow::WorkflowHistory;
use crate::ports::{ExpenseRepository, WorkflowHistoryRepository};

/// Command to approve a submitted expense.
#[derive(Debug, Clone)]
pub struct ApproveExpenseCommand {
    pub actor: UserId,
    pub expense_id: ExpenseId,
    pub comment: Option<String>,
}

/// Handler for expense approval.
///
/// Approval, consumption tracking, and the history row belong to one
/// logical operation; the deployment wraps the handler in one storage
/// transaction. Consumption is applied before the expense update is
/// persisted so a budget version conflict leaves the expense Submitted
/// and the whole command retryable.
pub struct ApproveExpenseHandler {
    expenses: Arc<dyn ExpenseRepository>,
    history: Arc<dyn WorkflowHistoryRepository>,
    tracker: Arc<BudgetConsumptionTracker>,
}

impl ApproveExpenseHandler {
    pub fn new(
        expenses: Arc<dyn ExpenseRepository>,
        history: Arc<dyn WorkflowHistoryRepository>,
        tracker: Arc<BudgetConsumptionTracker>,
    ) -> Self {
        Self {
            expenses,
            history,
            tracker,
        }
    }

    pub async fn handle(&self, cmd: ApproveExpenseCommand) -> Result<Expense, ExpenseError> {
        let mut expense = self
            .expenses
            .find_by_id(cmd.expense_id)
            .await?
            .ok_or(ExpenseError::NotFound(cmd.expense_id))?;

        let from = expense.status;
        expense.approve(Utc::now().date_naive())?;

        self.tracker.apply(&expense).await.map_err(|e| match e {
            BudgetError::ConcurrentModification(id) => {
                ExpenseError::ConcurrentModification(format!("budget {}", id))
            }
            other => ExpenseError::infrastructure(other.to_string()),
        })?;

        self.expenses.update(&expense).await?;
        self.history
            .append(&WorkflowHistory::record(
                expense.id,
                Some(from),
                expense.status,
                cmd.actor,
                cmd.comment,
            ))
            .await?;

        tracing::info!(expense_id = %expense.id, "expense approved");
        Ok(expense)
    }
}
