//! Expense aggregate entity.
//!
//! The Expense owns its segment allocations and attached documents; both
//! collections are replaced only through the aggregate so the split
//! invariant can never be bypassed.
//!
//! # Invariants
//!
//! - Active allocation percentages sum to exactly 100 whenever the
//!   expense is outside a transient draft edit (enforced by the
//!   allocation validator before any replacement).
//! - Status changes follow the `ExpenseStatus` state machine.
//! - Once submitted, an expense is only ever soft-deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{ExpenseId, Money, RecordMetadata, StateMachine, Timestamp, UserId};

use super::{ExpenseError, ExpenseStatus, SegmentAllocation};

/// A document attached to an expense (receipt, invoice, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub storage_key: String,
    pub uploaded_at: Timestamp,
}

/// Expense aggregate - one organizational expense submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier for this expense.
    pub id: ExpenseId,

    /// User who submitted the expense.
    pub submitter: UserId,

    /// Date the expense was incurred.
    pub expense_date: NaiveDate,

    /// Vendor the expense was paid to.
    pub vendor: Option<String>,

    /// Total amount across all allocations.
    pub total_amount: Money,

    /// ISO-4217 currency code.
    pub currency: String,

    /// Free-form description.
    pub description: Option<String>,

    /// Current lifecycle status.
    pub status: ExpenseStatus,

    /// Date the expense was submitted for approval.
    pub submission_date: Option<NaiveDate>,

    /// Date the expense was approved.
    pub approval_date: Option<NaiveDate>,

    /// Date the expense was paid out.
    pub payment_date: Option<NaiveDate>,

    /// External payment reference.
    pub payment_reference: Option<String>,

    /// Reason given when the expense was rejected.
    pub rejection_reason: Option<String>,

    /// Cost-center split, owned by this expense.
    pub allocations: Vec<SegmentAllocation>,

    /// Attached documents, owned by this expense.
    pub documents: Vec<Document>,

    /// Audit, soft-delete, and optimistic-lock metadata.
    pub meta: RecordMetadata,
}

impl Expense {
    /// Creates a new Draft expense with an already-validated allocation set.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        submitter: UserId,
        expense_date: NaiveDate,
        vendor: Option<String>,
        total_amount: Money,
        currency: String,
        description: Option<String>,
        allocations: Vec<SegmentAllocation>,
        documents: Vec<Document>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            submitter,
            expense_date,
            vendor,
            total_amount,
            currency,
            description,
            status: ExpenseStatus::Draft,
            submission_date: None,
            approval_date: None,
            payment_date: None,
            payment_reference: None,
            rejection_reason: None,
            allocations,
            documents,
            meta: RecordMetadata::new(),
        }
    }

    /// Returns true if the expense can currently be modified.
    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }

    /// Returns true if the expense can be submitted for approval.
    pub fn can_be_submitted(&self) -> bool {
        self.status == ExpenseStatus::Draft && !self.allocations.is_empty()
    }

    /// Submits the expense for approval.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the expense is a Draft, and
    /// `EmptyAllocations` when the split is missing.
    pub fn submit(&mut self, submission_date: NaiveDate) -> Result<(), ExpenseError> {
        if self.status == ExpenseStatus::Draft && self.allocations.is_empty() {
            return Err(ExpenseError::EmptyAllocations);
        }
        self.transition(ExpenseStatus::Submitted)?;
        self.submission_date = Some(submission_date);
        Ok(())
    }

    /// Approves a submitted expense.
    pub fn approve(&mut self, approval_date: NaiveDate) -> Result<(), ExpenseError> {
        self.transition(ExpenseStatus::Approved)?;
        self.approval_date = Some(approval_date);
        Ok(())
    }

    /// Rejects a submitted expense with a reason.
    pub fn reject(&mut self, reason: String) -> Result<(), ExpenseError> {
        self.transition(ExpenseStatus::Rejected)?;
        self.rejection_reason = Some(reason);
        Ok(())
    }

    /// Marks an approved expense as paid.
    pub fn mark_paid(
        &mut self,
        payment_date: NaiveDate,
        payment_reference: Option<String>,
    ) -> Result<(), ExpenseError> {
        self.transition(ExpenseStatus::Paid)?;
        self.payment_date = Some(payment_date);
        self.payment_reference = payment_reference;
        Ok(())
    }

    /// Returns a rejected expense to Draft so it can be reworked.
    ///
    /// The rejection reason is cleared; the audit trail keeps the record
    /// of the rejection itself.
    pub fn revert_to_draft(&mut self) -> Result<(), ExpenseError> {
        self.transition(ExpenseStatus::Draft)?;
        self.rejection_reason = None;
        self.submission_date = None;
        Ok(())
    }

    /// Replaces the allocation set and total atomically.
    ///
    /// The caller must have validated the set via
    /// [`validate_allocations`](super::validate_allocations).
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` unless the expense is Draft or Rejected.
    pub fn replace_allocations(
        &mut self,
        total_amount: Money,
        allocations: Vec<SegmentAllocation>,
    ) -> Result<(), ExpenseError> {
        if !self.is_editable() {
            return Err(ExpenseError::not_editable(self.status));
        }
        self.total_amount = total_amount;
        self.allocations = allocations;
        self.meta.touch();
        Ok(())
    }

    /// Soft-deletes the expense; submitted expenses are never removed.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` unless the expense is Draft or Rejected.
    pub fn soft_delete(&mut self) -> Result<(), ExpenseError> {
        if !self.is_editable() {
            return Err(ExpenseError::not_editable(self.status));
        }
        self.meta.mark_deleted();
        Ok(())
    }

    fn transition(&mut self, target: ExpenseStatus) -> Result<(), ExpenseError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| ExpenseError::invalid_transition(self.status, target))?;
        self.meta.touch();
        Ok(())
    }
}
