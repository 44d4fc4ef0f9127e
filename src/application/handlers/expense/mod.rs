//! Expense lifecycle handlers.

mod approve_expense;
mod create_expense;
mod delete_expense;
mod pay_expense;
mod reject_expense;
mod submit_expense;
mod update_expense;

pub use approve_expense::{ApproveExpenseCommand, ApproveExpenseHandler};
pub use create_expense::{CreateExpenseCommand, CreateExpenseHandler};
pub use delete_expense::{DeleteExpenseCommand, DeleteExpenseHandler};
pub use pay_expense::{PayExpenseCommand, PayExpenseHandler};
pub use reject_expense::{RejectExpenseCommand, RejectExpenseHandler};
pub use submit_expense::{SubmitExpenseCommand, SubmitExpenseHandler};
pub use update_expense::{UpdateExpenseCommand, UpdateExpenseHandler};
