//! Expense repository port.

use async_trait::async_trait;

use crate::domain::expense::{Expense, ExpenseStatus};
use crate::domain::foundation::{DomainError, ExpenseId, UserId};

/// Repository port for Expense aggregate persistence.
///
/// The expense and its allocation/document collections are saved as one
/// aggregate; implementations replace the child rows together with the
/// parent. All lookups filter soft-deleted records.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Persists a new expense with its allocations and documents.
    async fn insert(&self, expense: &Expense) -> Result<(), DomainError>;

    /// Updates an existing expense, replacing its child collections.
    ///
    /// # Errors
    ///
    /// - `ExpenseNotFound` if the expense does not exist
    async fn update(&self, expense: &Expense) -> Result<(), DomainError>;

    /// Finds a non-deleted expense by id.
    async fn find_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, DomainError>;

    /// Lists non-deleted expenses submitted by a user.
    async fn find_by_submitter(&self, submitter: UserId) -> Result<Vec<Expense>, DomainError>;

    /// Lists non-deleted expenses in a given status.
    async fn find_by_status(&self, status: ExpenseStatus) -> Result<Vec<Expense>, DomainError>;

    /// Lists all non-deleted expenses.
    async fn list(&self) -> Result<Vec<Expense>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expense_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ExpenseRepository) {}
    }
}
