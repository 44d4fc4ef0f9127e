//! Approval workflow repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, StepId, WorkflowId};
use crate::domain::workflow::ApprovalWorkflow;

/// Repository port for ApprovalWorkflow aggregate persistence.
///
/// A workflow's steps are saved with it: replacing the step list removes
/// the old rows and attaches the new ones in the same operation.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Persists a new workflow with its steps.
    async fn insert(&self, workflow: &ApprovalWorkflow) -> Result<(), DomainError>;

    /// Updates a workflow, replacing its step list.
    async fn update(&self, workflow: &ApprovalWorkflow) -> Result<(), DomainError>;

    /// Finds a non-deleted workflow by id.
    async fn find_by_id(&self, id: WorkflowId) -> Result<Option<ApprovalWorkflow>, DomainError>;

    /// Finds a non-deleted workflow by name.
    async fn find_by_name(&self, name: &str) -> Result<Option<ApprovalWorkflow>, DomainError>;

    /// Returns true if a non-deleted workflow with this name exists.
    async fn exists_by_name(&self, name: &str) -> Result<bool, DomainError>;

    /// Finds the non-deleted workflow owning a step.
    async fn find_by_step(&self, step_id: StepId)
        -> Result<Option<ApprovalWorkflow>, DomainError>;

    /// Lists non-deleted, active workflows.
    async fn list_active(&self) -> Result<Vec<ApprovalWorkflow>, DomainError>;

    /// Lists all non-deleted workflows.
    async fn list(&self) -> Result<Vec<ApprovalWorkflow>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn WorkflowRepository) {}
    }
}
