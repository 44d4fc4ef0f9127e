//! DeleteWorkflowHandler - soft-deletes a workflow.

use std::sync::Arc;

use crate::domain::foundation::WorkflowId;
use crate::domain::workflow::WorkflowError;
use crate::ports::WorkflowRepository;

/// Command to soft-delete a workflow.
#[derive(Debug, Clone)]
pub struct DeleteWorkflowCommand {
    pub workflow_id: WorkflowId,
}

/// Handler for workflow deletion. The name becomes reusable because
/// uniqueness is only enforced among non-deleted workflows.
pub struct DeleteWorkflowHandler {
    workflows: Arc<dyn WorkflowRepository>,
}

impl DeleteWorkflowHandler {
    pub fn new(workflows: Arc<dyn WorkflowRepository>) -> Self {
        Self { workflows }
    }

    pub async fn handle(&self, cmd: DeleteWorkflowCommand) -> Result<(), WorkflowError> {
        let mut workflow = self
            .workflows
            .find_by_id(cmd.workflow_id)
            .await?
            .ok_or(WorkflowError::NotFound(cmd.workflow_id))?;

        workflow.soft_delete();
        self.workflows.update(&workflow).await?;

        tracing::info!(workflow_id = %workflow.id, "workflow deleted");
        Ok(())
    }
}
