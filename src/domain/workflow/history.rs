//! Workflow history - immutable audit trail of status transitions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ExpenseId, HistoryId, Timestamp, UserId};
use crate::domain::expense::ExpenseStatus;

/// An immutable record of one expense status transition.
///
/// Exactly one record is appended per lifecycle transition, including
/// the creation transition where `from_status` is absent. Records are
/// never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowHistory {
    pub id: HistoryId,
    pub expense_id: ExpenseId,
    pub from_status: Option<ExpenseStatus>,
    pub to_status: ExpenseStatus,
    pub actor: UserId,
    pub comment: Option<String>,
    pub timestamp: Timestamp,
}

impl WorkflowHistory {
    /// Records a status transition.
    pub fn record(
        expense_id: ExpenseId,
        from_status: Option<ExpenseStatus>,
        to_status: ExpenseStatus,
        actor: UserId,
        comment: Option<String>,
    ) -> Self {
        Self {
            id: HistoryId::new(),
            expense_id,
            from_status,
            to_status,
            actor,
            comment,
            timestamp: Timestamp::now(),
        }
    }

    /// Describes the transition for audit display.
    pub fn transition_description(&self) -> String {
        match self.from_status {
            None => format!("Created with status {}", self.to_status),
            Some(from) => format!("Changed from {} to {}", from, self.to_status),
        }
    }

    /// Returns true if this records an approval.
    pub fn is_approval_transition(&self) -> bool {
        self.to_status == ExpenseStatus::Approved
    }

    /// Returns true if this records a rejection.
    pub fn is_rejection_transition(&self) -> bool {
        self.to_status == ExpenseStatus::Rejected
    }

    /// Returns true if this records the initial submission.
    pub fn is_submission_transition(&self) -> bool {
        self.from_status == Some(ExpenseStatus::Draft)
            && self.to_status == ExpenseStatus::Submitted
    }
}
