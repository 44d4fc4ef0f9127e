//! UpdateExpenseHandler - edits an expense while it is Draft or Rejected.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::expense::{
    validate_allocations, AllocationRequest, Expense, ExpenseError, ExpenseStatus,
};
use crate::domain::foundation::{ExpenseId, Money, UserId};
use crate::domain::workflow::WorkflowHistory;
use crate::ports::{Directory, ExpenseRepository, WorkflowHistoryRepository};

/// Command to edit an editable expense.
///
/// When both `total_amount` and `allocations` are given the allocation
/// set is replaced atomically after validation.
#[derive(Debug, Clone)]
pub struct UpdateExpenseCommand {
    pub actor: UserId,
    pub expense_id: ExpenseId,
    pub expense_date: Option<NaiveDate>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub total_amount: Option<Decimal>,
    pub allocations: Option<Vec<AllocationRequest>>,
}

/// Handler for expense edits.
///
/// Editing a Rejected expense returns it to Draft (with a history row)
/// so the rework can be resubmitted.
pub struct UpdateExpenseHandler {
    expenses: Arc<dyn ExpenseRepository>,
    history: Arc<dyn WorkflowHistoryRepository>,
    directory: Arc<dyn Directory>,
}

impl UpdateExpenseHandler {
    pub fn new(
        expenses: Arc<dyn ExpenseRepository>,
        history: Arc<dyn WorkflowHistoryRepository>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            expenses,
            history,
            directory,
        }
    }

    pub async fn handle(&self, cmd: UpdateExpenseCommand) -> Result<Expense, ExpenseError> {
        let mut expense = self
            .expenses
            .find_by_id(cmd.expense_id)
            .await?
            .ok_or(ExpenseError::NotFound(cmd.expense_id))?;

        if !expense.is_editable() {
            return Err(ExpenseError::not_editable(expense.status));
        }

        if let Some(date) = cmd.expense_date {
            expense.expense_date = date;
        }
        if let Some(vendor) = cmd.vendor {
            expense.vendor = Some(vendor);
        }
        if let Some(description) = cmd.description {
            expense.description = Some(description);
        }

        if let (Some(total), Some(requests)) = (cmd.total_amount, cmd.allocations.as_deref()) {
            for request in requests {
                if !self.directory.segment_exists(request.segment_id).await? {
                    return Err(ExpenseError::segment_not_found(request.segment_id));
                }
            }
            let total_amount = Money::try_new(total)
                .map_err(|e| ExpenseError::validation("total_amount", e.to_string()))?;
            let allocations = validate_allocations(total_amount, requests)?;
            expense.replace_allocations(total_amount, allocations)?;
        }

        let reverted = expense.status == ExpenseStatus::Rejected;
        if reverted {
            expense.revert_to_draft()?;
        }

        self.expenses.update(&expense).await?;

        if reverted {
            self.history
                .append(&WorkflowHistory::record(
                    expense.id,
                    Some(ExpenseStatus::Rejected),
                    ExpenseStatus::Draft,
                    cmd.actor,
                    None,
                ))
                .await?;
        }

        tracing::info!(expense_id = %expense.id, "expense updated");
        Ok(expense)
    }
}
