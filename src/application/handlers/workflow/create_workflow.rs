//! CreateWorkflowHandler - creates an approval workflow with its steps.

use std::sync::Arc;

use crate::domain::foundation::{RoleId, UserId};
use crate::domain::workflow::{ApprovalStep, ApprovalWorkflow, StepApprover, WorkflowError};
use crate::ports::{Directory, WorkflowRepository};

/// One requested step. Exactly one of `approver_role_id` and
/// `approver_user_id` must be set.
#[derive(Debug, Clone)]
pub struct StepRequest {
    pub step_name: Option<String>,
    pub step_order: i32,
    pub approver_role_id: Option<RoleId>,
    pub approver_user_id: Option<UserId>,
    pub is_mandatory: bool,
    pub condition: Option<String>,
}

/// Command to create a workflow.
#[derive(Debug, Clone)]
pub struct CreateWorkflowCommand {
    pub name: String,
    pub description: Option<String>,
    pub trigger_conditions: Option<String>,
    pub steps: Vec<StepRequest>,
}

/// Handler for workflow creation.
pub struct CreateWorkflowHandler {
    workflows: Arc<dyn WorkflowRepository>,
    directory: Arc<dyn Directory>,
}

impl CreateWorkflowHandler {
    pub fn new(workflows: Arc<dyn WorkflowRepository>, directory: Arc<dyn Directory>) -> Self {
        Self {
            workflows,
            directory,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateWorkflowCommand,
    ) -> Result<ApprovalWorkflow, WorkflowError> {
        if self.workflows.exists_by_name(&cmd.name).await? {
            return Err(WorkflowError::duplicate_name(cmd.name));
        }

        let steps = build_steps(self.directory.as_ref(), &cmd.steps).await?;
        let workflow =
            ApprovalWorkflow::create(cmd.name, cmd.description, cmd.trigger_conditions, steps)?;

        self.workflows.insert(&workflow).await?;
        tracing::info!(workflow_id = %workflow.id, name = %workflow.name, "workflow created");
        Ok(workflow)
    }

}

/// Resolves step requests into domain steps, checking each approver
/// reference against the directory.
pub(super) async fn build_steps(
    directory: &dyn Directory,
    requests: &[StepRequest],
) -> Result<Vec<ApprovalStep>, WorkflowError> {
    let mut steps = Vec::with_capacity(requests.len());
    for request in requests {
        let approver = match (request.approver_role_id, request.approver_user_id) {
            (Some(role), None) => {
                if !directory.role_exists(role).await? {
                    return Err(WorkflowError::RoleNotFound(role));
                }
                StepApprover::Role(role)
            }
            (None, Some(user)) => {
                if !directory.user_exists(user).await? {
                    return Err(WorkflowError::UserNotFound(user));
                }
                StepApprover::User(user)
            }
            _ => {
                return Err(WorkflowError::validation(
                    "approver",
                    "A step names exactly one approver: a role or a user",
                ));
            }
        };
        steps.push(ApprovalStep::new(
            request.step_name.clone(),
            request.step_order,
            approver,
            request.is_mandatory,
            request.condition.clone(),
        ));
    }
    Ok(steps)
}
