//! Expense lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode, StateMachine};

/// Lifecycle status of an expense.
///
/// `Draft -> Submitted -> {Approved, Rejected} -> Paid`, with
/// `Rejected -> Draft` permitted so a rejected expense can be reworked
/// and resubmitted. `Paid` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
    Paid,
}

impl ExpenseStatus {
    /// Parses a status from its wire representation.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.to_uppercase().as_str() {
            "DRAFT" => Ok(ExpenseStatus::Draft),
            "SUBMITTED" => Ok(ExpenseStatus::Submitted),
            "APPROVED" => Ok(ExpenseStatus::Approved),
            "REJECTED" => Ok(ExpenseStatus::Rejected),
            "PAID" => Ok(ExpenseStatus::Paid),
            _ => Err(DomainError::new(
                ErrorCode::InvalidEnumValue,
                format!("Unknown expense status: {}", value),
            )),
        }
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Draft => "DRAFT",
            ExpenseStatus::Submitted => "SUBMITTED",
            ExpenseStatus::Approved => "APPROVED",
            ExpenseStatus::Rejected => "REJECTED",
            ExpenseStatus::Paid => "PAID",
        }
    }

    /// Returns true if the expense can be modified in this status.
    pub fn is_editable(&self) -> bool {
        matches!(self, ExpenseStatus::Draft | ExpenseStatus::Rejected)
    }
}

impl StateMachine for ExpenseStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ExpenseStatus::*;
        matches!(
            (self, target),
            (Draft, Submitted)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (Approved, Paid)
                | (Rejected, Draft)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ExpenseStatus::*;
        match self {
            Draft => vec![Submitted],
            Submitted => vec![Approved, Rejected],
            Approved => vec![Paid],
            Rejected => vec![Draft],
            Paid => vec![],
        }
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_statuses() {
        assert_eq!(ExpenseStatus::parse("DRAFT").unwrap(), ExpenseStatus::Draft);
        assert_eq!(ExpenseStatus::parse("paid").unwrap(), ExpenseStatus::Paid);
    }

    #[test]
    fn parse_rejects_unknown_status() {
        let err = ExpenseStatus::parse("PENDING").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEnumValue);
    }

    #[test]
    fn draft_can_only_be_submitted() {
        assert_eq!(
            ExpenseStatus::Draft.valid_transitions(),
            vec![ExpenseStatus::Submitted]
        );
    }

    #[test]
    fn submitted_resolves_to_approved_or_rejected() {
        let targets = ExpenseStatus::Submitted.valid_transitions();
        assert!(targets.contains(&ExpenseStatus::Approved));
        assert!(targets.contains(&ExpenseStatus::Rejected));
        assert!(!targets.contains(&ExpenseStatus::Paid));
    }

    #[test]
    fn rejected_returns_to_draft() {
        assert!(ExpenseStatus::Rejected.can_transition_to(&ExpenseStatus::Draft));
        assert!(!ExpenseStatus::Rejected.can_transition_to(&ExpenseStatus::Submitted));
    }

    #[test]
    fn paid_is_terminal() {
        assert!(ExpenseStatus::Paid.is_terminal());
    }

    #[test]
    fn approval_is_unreachable_from_draft() {
        assert!(!ExpenseStatus::Draft.can_transition_to(&ExpenseStatus::Approved));
        assert!(!ExpenseStatus::Draft.can_transition_to(&ExpenseStatus::Rejected));
    }

    #[test]
    fn editable_states_are_draft_and_rejected() {
        assert!(ExpenseStatus::Draft.is_editable());
        assert!(ExpenseStatus::Rejected.is_editable());
        assert!(!ExpenseStatus::Submitted.is_editable());
        assert!(!ExpenseStatus::Approved.is_editable());
        assert!(!ExpenseStatus::Paid.is_editable());
    }
}
