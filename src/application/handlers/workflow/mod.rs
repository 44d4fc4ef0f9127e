//! Approval workflow handlers.

mod approval_queries;
mod create_workflow;
mod delete_workflow;
mod record_action;
mod update_workflow;

pub use approval_queries::ApprovalQueries;
pub use create_workflow::{CreateWorkflowCommand, CreateWorkflowHandler, StepRequest};
pub use delete_workflow::{DeleteWorkflowCommand, DeleteWorkflowHandler};
pub use record_action::{RecordActionCommand, RecordActionHandler};
pub use update_workflow::{UpdateWorkflowCommand, UpdateWorkflowHandler};
