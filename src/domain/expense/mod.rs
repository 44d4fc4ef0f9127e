//! Expense bounded context.
//!
//! The Expense aggregate owns its segment allocations and attached
//! documents; the allocation validator enforces the 100% split invariant.

mod aggregate;
mod allocation;
mod errors;
mod status;

pub use aggregate::{Document, Expense};
pub use allocation::{validate_allocations, AllocationRequest, SegmentAllocation};
pub use errors::ExpenseError;
pub use status::ExpenseStatus;
