//! UpdateWorkflowHandler - edits a workflow; step lists are replaced
//! wholesale.

use std::sync::Arc;

use crate::domain::foundation::WorkflowId;
use crate::domain::workflow::{ApprovalWorkflow, WorkflowError};
use crate::ports::{Directory, WorkflowRepository};

use super::create_workflow::{build_steps, StepRequest};

/// Command to update a workflow. A `steps` value replaces the whole
/// step list; `None` leaves the list untouched.
#[derive(Debug, Clone)]
pub struct UpdateWorkflowCommand {
    pub workflow_id: WorkflowId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub trigger_conditions: Option<String>,
    pub is_active: Option<bool>,
    pub steps: Option<Vec<StepRequest>>,
}

/// Handler for workflow updates.
pub struct UpdateWorkflowHandler {
    workflows: Arc<dyn WorkflowRepository>,
    directory: Arc<dyn Directory>,
}

impl UpdateWorkflowHandler {
    pub fn new(workflows: Arc<dyn WorkflowRepository>, directory: Arc<dyn Directory>) -> Self {
        Self {
            workflows,
            directory,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateWorkflowCommand,
    ) -> Result<ApprovalWorkflow, WorkflowError> {
        let mut workflow = self
            .workflows
            .find_by_id(cmd.workflow_id)
            .await?
            .ok_or(WorkflowError::NotFound(cmd.workflow_id))?;

        if let Some(name) = cmd.name {
            if name != workflow.name && self.workflows.exists_by_name(&name).await? {
                return Err(WorkflowError::duplicate_name(name));
            }
            workflow.rename(name);
        }
        if let Some(description) = cmd.description {
            workflow.description = Some(description);
        }
        if let Some(trigger_conditions) = cmd.trigger_conditions {
            workflow.trigger_conditions = Some(trigger_conditions);
        }
        if let Some(is_active) = cmd.is_active {
            if is_active {
                workflow.activate();
            } else {
                workflow.deactivate();
            }
        }
        if let Some(requests) = cmd.steps.as_deref() {
            let steps = build_steps(self.directory.as_ref(), requests).await?;
            workflow.replace_steps(steps)?;
        }

        self.workflows.update(&workflow).await?;
        tracing::info!(workflow_id = %workflow.id, "workflow updated");
        Ok(workflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryDirectory, InMemoryWorkflowRepository};
    use crate::domain::foundation::RoleId;

    struct Fixture {
        workflows: Arc<InMemoryWorkflowRepository>,
        directory: Arc<InMemoryDirectory>,
        handler: UpdateWorkflowHandler,
    }

    fn fixture() -> Fixture {
        let workflows = Arc::new(InMemoryWorkflowRepository::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let handler = UpdateWorkflowHandler::new(workflows.clone(), directory.clone());
        Fixture {
            workflows,
            directory,
            handler,
        }
    }

    async fn seeded_workflow(fixture: &Fixture, name: &str) -> ApprovalWorkflow {
        let workflow = ApprovalWorkflow::create(name.to_string(), None, None, vec![]).unwrap();
        fixture.workflows.insert(&workflow).await.unwrap();
        workflow
    }

    fn bare_command(workflow_id: WorkflowId) -> UpdateWorkflowCommand {
        UpdateWorkflowCommand {
            workflow_id,
            name: None,
            description: None,
            trigger_conditions: None,
            is_active: None,
            steps: None,
        }
    }

    #[tokio::test]
    async fn replaces_step_list_wholesale() {
        let fixture = fixture();
        let workflow = seeded_workflow(&fixture, "Default Approval").await;
        let role = RoleId::new();
        fixture.directory.register_role(role).await;

        let mut cmd = bare_command(workflow.id);
        cmd.steps = Some(vec![
            StepRequest {
                step_name: None,
                step_order: 1,
                approver_role_id: Some(role),
                approver_user_id: None,
                is_mandatory: true,
                condition: None,
            },
            StepRequest {
                step_name: None,
                step_order: 2,
                approver_role_id: Some(role),
                approver_user_id: None,
                is_mandatory: false,
                condition: None,
            },
        ]);

        let updated = fixture.handler.handle(cmd).await.unwrap();
        assert_eq!(updated.steps.len(), 2);
    }

    #[tokio::test]
    async fn rename_to_existing_name_fails() {
        let fixture = fixture();
        seeded_workflow(&fixture, "First").await;
        let second = seeded_workflow(&fixture, "Second").await;

        let mut cmd = bare_command(second.id);
        cmd.name = Some("First".to_string());

        let result = fixture.handler.handle(cmd).await;
        assert!(matches!(result, Err(WorkflowError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn rename_to_own_name_is_allowed() {
        let fixture = fixture();
        let workflow = seeded_workflow(&fixture, "Default Approval").await;

        let mut cmd = bare_command(workflow.id);
        cmd.name = Some("Default Approval".to_string());

        assert!(fixture.handler.handle(cmd).await.is_ok());
    }

    #[tokio::test]
    async fn deactivation_via_flag() {
        let fixture = fixture();
        let workflow = seeded_workflow(&fixture, "Default Approval").await;

        let mut cmd = bare_command(workflow.id);
        cmd.is_active = Some(false);

        let updated = fixture.handler.handle(cmd).await.unwrap();
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn unknown_workflow_fails() {
        let fixture = fixture();
        let result = fixture.handler.handle(bare_command(WorkflowId::new())).await;
        assert!(matches!(result, Err(WorkflowError::NotFound(_))));
    }
}
