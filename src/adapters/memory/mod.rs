//! In-memory adapter implementations.
//!
//! Back every persistence and collaborator port with `RwLock`-guarded
//! maps. Used by handler tests and suitable for single-process
//! deployments; not for production multi-server setups.

mod actions;
mod alerts;
mod budgets;
mod cache;
mod directory;
mod expenses;
mod history;
mod thresholds;
mod workflows;

pub use actions::InMemoryActionRepository;
pub use alerts::InMemoryAlertRepository;
pub use budgets::InMemoryBudgetRepository;
pub use cache::InMemoryCache;
pub use directory::InMemoryDirectory;
pub use expenses::InMemoryExpenseRepository;
pub use history::InMemoryHistoryRepository;
pub use thresholds::InMemoryThresholdRepository;
pub use workflows::InMemoryWorkflowRepository;
