//! RecordActionHandler - appends immutable approval actions.

use std::sync::Arc;

use crate::domain::foundation::{ExpenseId, StepId, UserId};
use crate::domain::workflow::{
    ApprovalAction, ApprovalActionKind, StepApprover, WorkflowError,
};
use crate::ports::{ApprovalActionRepository, Directory, ExpenseRepository, WorkflowRepository};

/// Command to record an approver's action on an expense.
#[derive(Debug, Clone)]
pub struct RecordActionCommand {
    /// Resolved acting user; recorded as the approver.
    pub actor: UserId,
    pub expense_id: ExpenseId,
    pub step_id: Option<StepId>,
    pub kind: ApprovalActionKind,
    pub comment: Option<String>,
    pub delegated_to: Option<UserId>,
}

/// Handler for action recording.
///
/// Recording an action never moves the expense lifecycle; callers decide
/// when to invoke approve/reject based on the accumulated actions. When
/// a step is referenced it must belong to an active workflow, and for
/// approve/reject actions the actor must satisfy the step's approver
/// rule: an exact match for a user-approver step, role membership for a
/// role-approver step.
pub struct RecordActionHandler {
    actions: Arc<dyn ApprovalActionRepository>,
    expenses: Arc<dyn ExpenseRepository>,
    workflows: Arc<dyn WorkflowRepository>,
    directory: Arc<dyn Directory>,
}

impl RecordActionHandler {
    pub fn new(
        actions: Arc<dyn ApprovalActionRepository>,
        expenses: Arc<dyn ExpenseRepository>,
        workflows: Arc<dyn WorkflowRepository>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            actions,
            expenses,
            workflows,
            directory,
        }
    }

    pub async fn handle(&self, cmd: RecordActionCommand) -> Result<ApprovalAction, WorkflowError> {
        if self.expenses.find_by_id(cmd.expense_id).await?.is_none() {
            return Err(WorkflowError::ExpenseNotFound(cmd.expense_id));
        }
        if !self.directory.user_exists(cmd.actor).await? {
            return Err(WorkflowError::UserNotFound(cmd.actor));
        }

        if let Some(step_id) = cmd.step_id {
            let workflow = self
                .workflows
                .find_by_step(step_id)
                .await?
                .ok_or(WorkflowError::StepNotFound(step_id))?;
            if !workflow.is_active {
                return Err(WorkflowError::Inactive(workflow.id));
            }

            if matches!(
                cmd.kind,
                ApprovalActionKind::Approved | ApprovalActionKind::Rejected
            ) {
                let step = workflow
                    .step(step_id)
                    .ok_or(WorkflowError::StepNotFound(step_id))?;
                self.check_approver(step.approver, cmd.actor).await?;
            }
        }

        if let Some(delegate) = cmd.delegated_to {
            if !self.directory.user_exists(delegate).await? {
                return Err(WorkflowError::UserNotFound(delegate));
            }
        }

        let action = ApprovalAction::record(
            cmd.expense_id,
            cmd.step_id,
            cmd.actor,
            cmd.kind,
            cmd.comment,
            cmd.delegated_to,
        )?;
        self.actions.append(&action).await?;

        tracing::info!(
            expense_id = %cmd.expense_id,
            kind = %cmd.kind,
            "approval action recorded"
        );
        Ok(action)
    }

    async fn check_approver(
        &self,
        approver: StepApprover,
        actor: UserId,
    ) -> Result<(), WorkflowError> {
        let eligible = match approver {
            StepApprover::User(user) => user == actor,
            StepApprover::Role(role) => self.directory.user_has_role(actor, role).await?,
        };
        if eligible {
            Ok(())
        } else {
            Err(WorkflowError::validation(
                "approver",
                "Actor does not satisfy the step's approver rule",
            ))
        }
    }
}
