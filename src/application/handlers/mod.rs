//! Command handlers, one per operation.
//!
//! Each handler is a struct holding its port collaborators behind
//! `Arc<dyn Trait>`, with a single `handle` method taking an
//! already-validated command carrying the resolved acting user.

pub mod budget;
pub mod expense;
pub mod workflow;
