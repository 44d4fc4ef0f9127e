//! Approval workflow bounded context.
//!
//! Workflows and their ordered steps form one aggregate; approval
//! actions and the status-transition history are immutable facts that
//! only ever accumulate.

mod action;
mod aggregate;
mod errors;
mod history;

pub use action::{ApprovalAction, ApprovalActionKind};
pub use aggregate::{ApprovalStep, ApprovalWorkflow, StepApprover};
pub use errors::WorkflowError;
pub use history::WorkflowHistory;
