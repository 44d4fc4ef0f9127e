//! In-memory approval workflow repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, StepId, WorkflowId};
use crate::domain::workflow::ApprovalWorkflow;
use crate::ports::WorkflowRepository;

/// In-memory workflow store keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryWorkflowRepository {
    workflows: Arc<RwLock<HashMap<WorkflowId, ApprovalWorkflow>>>,
}

impl InMemoryWorkflowRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn insert(&self, workflow: &ApprovalWorkflow) -> Result<(), DomainError> {
        self.workflows
            .write()
            .await
            .insert(workflow.id, workflow.clone());
        Ok(())
    }

    async fn update(&self, workflow: &ApprovalWorkflow) -> Result<(), DomainError> {
        let mut workflows = self.workflows.write().await;
        if !workflows.contains_key(&workflow.id) {
            return Err(DomainError::new(
                ErrorCode::WorkflowNotFound,
                format!("Workflow not found: {}", workflow.id),
            ));
        }
        workflows.insert(workflow.id, workflow.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: WorkflowId,
    ) -> Result<Option<ApprovalWorkflow>, DomainError> {
        Ok(self
            .workflows
            .read()
            .await
            .get(&id)
            .filter(|w| !w.meta.is_deleted())
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApprovalWorkflow>, DomainError> {
        Ok(self
            .workflows
            .read()
            .await
            .values()
            .find(|w| !w.meta.is_deleted() && w.name == name)
            .cloned())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    async fn find_by_step(
        &self,
        step_id: StepId,
    ) -> Result<Option<ApprovalWorkflow>, DomainError> {
        Ok(self
            .workflows
            .read()
            .await
            .values()
            .find(|w| !w.meta.is_deleted() && w.step(step_id).is_some())
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<ApprovalWorkflow>, DomainError> {
        Ok(self
            .workflows
            .read()
            .await
            .values()
            .filter(|w| !w.meta.is_deleted() && w.is_active)
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<ApprovalWorkflow>, DomainError> {
        Ok(self
            .workflows
            .read()
            .await
            .values()
            .filter(|w| !w.meta.is_deleted())
            .cloned()
            .collect())
    }
}
