//! Cache port with an explicit, documented key scheme.
//!
//! Caching is never annotation-driven: mutating operations invalidate
//! the keys they touch, co-located with the mutation itself.
//!
//! # Key scheme
//!
//! | Key | Value |
//! |-----|-------|
//! | `budget:{id}` | serialized Budget |

use async_trait::async_trait;

use crate::domain::foundation::{BudgetId, DomainError};

/// Cache key for a budget.
pub fn budget_key(id: BudgetId) -> String {
    format!("budget:{}", id)
}

/// String-keyed cache with per-entry TTL.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Reads a cached value.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Writes a value with a time-to-live in seconds.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), DomainError>;

    /// Removes a key. Missing keys are not an error.
    async fn invalidate(&self, key: &str) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_key_uses_documented_scheme() {
        let id = BudgetId::new();
        assert_eq!(budget_key(id), format!("budget:{}", id));
    }

    #[test]
    fn cache_is_object_safe() {
        fn _accepts_dyn(_cache: &dyn Cache) {}
    }
}
