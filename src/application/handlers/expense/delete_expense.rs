//! DeleteExpenseHandler - soft-deletes an editable expense.

use std::sync::Arc;

use crate::domain::expense::ExpenseError;
use crate::domain::foundation::{ExpenseId, UserId};
use crate::ports::ExpenseRepository;

/// Command to soft-delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseCommand {
    pub actor: UserId,
    pub expense_id: ExpenseId,
}

/// Handler for expense deletion. Records a tombstone; the expense is
/// never physically removed once it exists.
pub struct DeleteExpenseHandler {
    expenses: Arc<dyn ExpenseRepository>,
}

impl DeleteExpenseHandler {
    pub fn new(expenses: Arc<dyn ExpenseRepository>) -> Self {
        Self { expenses }
    }

    pub async fn handle(&self, cmd: DeleteExpenseCommand) -> Result<(), ExpenseError> {
        let mut expense = self
            .expenses
            .find_by_id(cmd.expense_id)
            .await?
            .ok_or(ExpenseError::NotFound(cmd.expense_id))?;

        expense.soft_delete()?;
        self.expenses.update(&expense).await?;

        tracing::info!(expense_id = %expense.id, actor = %cmd.actor, "expense deleted");
        Ok(())
    }
}
