//! Approval actions - immutable facts about what an approver did.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::{ExpenseId, StepId, Timestamp, UserId};

use super::WorkflowError;

/// The kind of action an approver took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalActionKind {
    Approved,
    Rejected,
    Delegated,
    Commented,
}

impl ApprovalActionKind {
    /// Parses an action kind from its wire representation.
    pub fn parse(value: &str) -> Result<Self, WorkflowError> {
        match value.to_uppercase().as_str() {
            "APPROVED" => Ok(ApprovalActionKind::Approved),
            "REJECTED" => Ok(ApprovalActionKind::Rejected),
            "DELEGATED" => Ok(ApprovalActionKind::Delegated),
            "COMMENTED" => Ok(ApprovalActionKind::Commented),
            _ => Err(WorkflowError::InvalidActionKind(value.to_string())),
        }
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalActionKind::Approved => "APPROVED",
            ApprovalActionKind::Rejected => "REJECTED",
            ApprovalActionKind::Delegated => "DELEGATED",
            ApprovalActionKind::Commented => "COMMENTED",
        }
    }
}

impl fmt::Display for ApprovalActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable record of one approver action on an expense.
///
/// Actions are append-only; they are never updated or deleted, and
/// recording one never moves the expense lifecycle by itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalAction {
    pub id: Uuid,
    pub expense_id: ExpenseId,
    pub step_id: Option<StepId>,
    pub approver: UserId,
    pub kind: ApprovalActionKind,
    pub comment: Option<String>,
    pub delegated_to: Option<UserId>,
    pub action_date: Timestamp,
}

impl ApprovalAction {
    /// Records a new action.
    ///
    /// # Errors
    ///
    /// Returns `MissingDelegate` when a `Delegated` action names no
    /// delegate.
    pub fn record(
        expense_id: ExpenseId,
        step_id: Option<StepId>,
        approver: UserId,
        kind: ApprovalActionKind,
        comment: Option<String>,
        delegated_to: Option<UserId>,
    ) -> Result<Self, WorkflowError> {
        if kind == ApprovalActionKind::Delegated && delegated_to.is_none() {
            return Err(WorkflowError::MissingDelegate);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            expense_id,
            step_id,
            approver,
            kind,
            comment,
            delegated_to,
            action_date: Timestamp::now(),
        })
    }

    /// Returns true if this action approves at the given step.
    pub fn approves_step(&self, step_id: StepId) -> bool {
        self.kind == ApprovalActionKind::Approved && self.step_id == Some(step_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_kinds() {
        assert_eq!(
            ApprovalActionKind::parse("APPROVED").unwrap(),
            ApprovalActionKind::Approved
        );
        assert_eq!(
            ApprovalActionKind::parse("delegated").unwrap(),
            ApprovalActionKind::Delegated
        );
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        assert!(matches!(
            ApprovalActionKind::parse("ESCALATED"),
            Err(WorkflowError::InvalidActionKind(_))
        ));
    }

    #[test]
    fn record_approval_succeeds_without_delegate() {
        let action = ApprovalAction::record(
            ExpenseId::new(),
            Some(StepId::new()),
            UserId::new(),
            ApprovalActionKind::Approved,
            Some("looks good".to_string()),
            None,
        )
        .unwrap();

        assert_eq!(action.kind, ApprovalActionKind::Approved);
        assert!(action.delegated_to.is_none());
    }

    #[test]
    fn delegation_requires_delegate() {
        let result = ApprovalAction::record(
            ExpenseId::new(),
            None,
            UserId::new(),
            ApprovalActionKind::Delegated,
            None,
            None,
        );
        assert!(matches!(result, Err(WorkflowError::MissingDelegate)));

        let delegate = UserId::new();
        let action = ApprovalAction::record(
            ExpenseId::new(),
            None,
            UserId::new(),
            ApprovalActionKind::Delegated,
            None,
            Some(delegate),
        )
        .unwrap();
        assert_eq!(action.delegated_to, Some(delegate));
    }

    #[test]
    fn approves_step_matches_kind_and_step() {
        let step = StepId::new();
        let action = ApprovalAction::record(
            ExpenseId::new(),
            Some(step),
            UserId::new(),
            ApprovalActionKind::Approved,
            None,
            None,
        )
        .unwrap();

        assert!(action.approves_step(step));
        assert!(!action.approves_step(StepId::new()));

        let comment = ApprovalAction::record(
            ExpenseId::new(),
            Some(step),
            UserId::new(),
            ApprovalActionKind::Commented,
            Some("note".to_string()),
            None,
        )
        .unwrap();
        assert!(!comment.approves_step(step));
    }
}
