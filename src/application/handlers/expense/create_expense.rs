//! CreateExpenseHandler - creates a Draft expense with validated allocations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::expense::{validate_allocations, AllocationRequest, Expense, ExpenseError};
use crate::domain::foundation::{Money, UserId};
use crate::domain::workflow::WorkflowHistory;
use crate::ports::{Directory, ExpenseRepository, WorkflowHistoryRepository};

/// Command to create a new expense in Draft status.
#[derive(Debug, Clone)]
pub struct CreateExpenseCommand {
    /// Resolved acting user; becomes the submitter.
    pub actor: UserId,
    pub expense_date: NaiveDate,
    pub vendor: Option<String>,
    pub total_amount: Decimal,
    pub currency: String,
    pub description: Option<String>,
    pub allocations: Vec<AllocationRequest>,
}

/// Handler for expense creation.
pub struct CreateExpenseHandler {
    expenses: Arc<dyn ExpenseRepository>,
    history: Arc<dyn WorkflowHistoryRepository>,
    directory: Arc<dyn Directory>,
}

impl CreateExpenseHandler {
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

    pub async fn handle(&self, cmd: CreateExpenseCommand) -> Result<Expense, ExpenseError> {
        if !self.directory.user_exists(cmd.actor).await? {
            return Err(ExpenseError::submitter_not_found(cmd.actor));
        }

        for allocation in &cmd.allocations {
            if !self.directory.segment_exists(allocation.segment_id).await? {
                return Err(ExpenseError::segment_not_found(allocation.segment_id));
            }
        }

        let total_amount = Money::try_new(cmd.total_amount)
            .map_err(|e| ExpenseError::validation("total_amount", e.to_string()))?;

        let allocations = validate_allocations(total_amount, &cmd.allocations)?;

        let expense = Expense::create(
            cmd.actor,
            cmd.expense_date,
            cmd.vendor,
            total_amount,
            cmd.currency,
            cmd.description,
            allocations,
            vec![],
        );

        self.expenses.insert(&expense).await?;
        self.history
            .append(&WorkflowHistory::record(
                expense.id,
                None,
                expense.status,
                cmd.actor,
                None,
            ))
            .await?;

        tracing::info!(expense_id = %expense.id, "expense created");
        Ok(expense)
    }
}
