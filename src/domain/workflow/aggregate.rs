//! Approval workflow aggregate.
//!
//! A workflow and its ordered steps form one aggregate: steps are
//! created and removed only through the owning workflow, and replacing
//! the step list is all-or-nothing.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::{RecordMetadata, RoleId, StepId, UserId, WorkflowId};

use super::WorkflowError;

/// Who may approve at a step: any holder of a role, or one named user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum StepApprover {
    Role(RoleId),
    User(UserId),
}

/// One ordered stage of an approval workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStep {
    /// Unique identifier for this step.
    pub id: StepId,

    /// Display name of the step.
    pub step_name: Option<String>,

    /// Position within the workflow; unique per workflow.
    pub step_order: i32,

    /// Required approver, by role or by specific user.
    pub approver: StepApprover,

    /// Whether the step must be passed for the workflow to complete.
    pub is_mandatory: bool,

    /// Optional condition expression gating the step.
    pub condition: Option<String>,
}

impl ApprovalStep {
    /// Creates a new step.
    pub fn new(
        step_name: Option<String>,
        step_order: i32,
        approver: StepApprover,
        is_mandatory: bool,
        condition: Option<String>,
    ) -> Self {
        Self {
            id: StepId::new(),
            step_name,
            step_order,
            approver,
            is_mandatory,
            condition,
        }
    }

    /// Returns true if this step names a specific user as approver.
    pub fn requires_specific_user(&self) -> bool {
        matches!(self.approver, StepApprover::User(_))
    }

    /// Returns true if this step is resolved by role membership.
    pub fn requires_role_approval(&self) -> bool {
        matches!(self.approver, StepApprover::Role(_))
    }
}

/// Approval workflow aggregate - a named, ordered set of approval steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalWorkflow {
    /// Unique identifier for this workflow.
    pub id: WorkflowId,

    /// Name, unique among non-deleted workflows.
    pub name: String,

    /// Free-form description.
    pub description: Option<String>,

    /// Trigger-condition expression matched by an external router.
    pub trigger_conditions: Option<String>,

    /// Whether the workflow may govern new approvals.
    pub is_active: bool,

    /// Ordered steps, owned by this workflow.
    pub steps: Vec<ApprovalStep>,

    /// Audit, soft-delete, and optimistic-lock metadata.
    pub meta: RecordMetadata,
}

impl ApprovalWorkflow {
    /// Creates a new active workflow with a validated step list.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateStepOrder` if two steps share an order.
    pub fn create(
        name: String,
        description: Option<String>,
        trigger_conditions: Option<String>,
        steps: Vec<ApprovalStep>,
    ) -> Result<Self, WorkflowError> {
        Self::check_step_orders(&steps)?;
        Ok(Self {
            id: WorkflowId::new(),
            name,
            description,
            trigger_conditions,
            is_active: true,
            steps: Self::sorted(steps),
            meta: RecordMetadata::new(),
        })
    }

    /// Replaces the entire step list, all-or-nothing.
    ///
    /// Old steps are dropped and the new list attached in one operation;
    /// there are no partial step updates.
    pub fn replace_steps(&mut self, steps: Vec<ApprovalStep>) -> Result<(), WorkflowError> {
        Self::check_step_orders(&steps)?;
        self.steps = Self::sorted(steps);
        self.meta.touch();
        Ok(())
    }

    /// Renames the workflow; uniqueness is checked by the caller against
    /// the repository.
    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.meta.touch();
    }

    /// Finds a step owned by this workflow.
    pub fn step(&self, id: StepId) -> Option<&ApprovalStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Returns the mandatory steps in order.
    pub fn mandatory_steps(&self) -> impl Iterator<Item = &ApprovalStep> {
        self.steps.iter().filter(|s| s.is_mandatory)
    }

    /// Marks the workflow usable for new approvals.
    pub fn activate(&mut self) {
        self.is_active = true;
        self.meta.touch();
    }

    /// Marks the workflow unusable for new approvals.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.meta.touch();
    }

    /// Soft-deletes the workflow.
    pub fn soft_delete(&mut self) {
        self.meta.mark_deleted();
    }

    fn check_step_orders(steps: &[ApprovalStep]) -> Result<(), WorkflowError> {
        let mut seen = HashSet::new();
        for step in steps {
            if !seen.insert(step.step_order) {
                return Err(WorkflowError::DuplicateStepOrder(step.step_order));
            }
        }
        Ok(())
    }

    fn sorted(mut steps: Vec<ApprovalStep>) -> Vec<ApprovalStep> {
        steps.sort_by_key(|s| s.step_order);
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role_step(order: i32) -> ApprovalStep {
        ApprovalStep::new(
            Some(format!("Step {}", order)),
            order,
            StepApprover::Role(RoleId::new()),
            true,
            None,
        )
    }

    #[test]
    fn create_sorts_steps_by_order() {
        let workflow = ApprovalWorkflow::create(
            "Default Approval".to_string(),
            None,
            None,
            vec![role_step(2), role_step(1)],
        )
        .unwrap();

        assert!(workflow.is_active);
        assert_eq!(workflow.steps[0].step_order, 1);
        assert_eq!(workflow.steps[1].step_order, 2);
    }

    #[test]
    fn create_rejects_duplicate_step_order() {
        let result = ApprovalWorkflow::create(
            "Default Approval".to_string(),
            None,
            None,
            vec![role_step(1), role_step(1)],
        );
        assert!(matches!(result, Err(WorkflowError::DuplicateStepOrder(1))));
    }

    #[test]
    fn replace_steps_is_all_or_nothing() {
        let mut workflow = ApprovalWorkflow::create(
            "Default Approval".to_string(),
            None,
            None,
            vec![role_step(1)],
        )
        .unwrap();
        let original = workflow.steps.clone();

        let result = workflow.replace_steps(vec![role_step(1), role_step(1)]);
        assert!(result.is_err());
        assert_eq!(workflow.steps, original);

        workflow
            .replace_steps(vec![role_step(1), role_step(2), role_step(3)])
            .unwrap();
        assert_eq!(workflow.steps.len(), 3);
        assert!(workflow.steps.iter().all(|s| !original.contains(s)));
    }

    #[test]
    fn step_lookup_finds_owned_steps_only() {
        let workflow = ApprovalWorkflow::create(
            "Default Approval".to_string(),
            None,
            None,
            vec![role_step(1)],
        )
        .unwrap();

        let owned = workflow.steps[0].id;
        assert!(workflow.step(owned).is_some());
        assert!(workflow.step(StepId::new()).is_none());
    }

    #[test]
    fn mandatory_steps_filters_optional() {
        let mut optional = role_step(2);
        optional.is_mandatory = false;

        let workflow = ApprovalWorkflow::create(
            "Default Approval".to_string(),
            None,
            None,
            vec![role_step(1), optional],
        )
        .unwrap();

        let mandatory: Vec<_> = workflow.mandatory_steps().collect();
        assert_eq!(mandatory.len(), 1);
        assert_eq!(mandatory[0].step_order, 1);
    }

    #[test]
    fn deactivate_then_activate_toggles_flag() {
        let mut workflow =
            ApprovalWorkflow::create("Default Approval".to_string(), None, None, vec![]).unwrap();
        workflow.deactivate();
        assert!(!workflow.is_active);
        workflow.activate();
        assert!(workflow.is_active);
    }

    #[test]
    fn approver_kind_predicates() {
        let role = role_step(1);
        assert!(role.requires_role_approval());
        assert!(!role.requires_specific_user());

        let user = ApprovalStep::new(None, 2, StepApprover::User(UserId::new()), false, None);
        assert!(user.requires_specific_user());
    }
}
