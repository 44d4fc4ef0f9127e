//! Record metadata embedded in every persisted aggregate.
//!
//! Replaces the audit-field base-class inheritance of classic ORM stacks
//! with a composed value: creation/update stamps, the soft-delete
//! tombstone, and the optimistic-concurrency version counter.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Audit, soft-delete, and optimistic-lock fields shared by aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// When the record was created.
    pub created_at: Timestamp,

    /// When the record was last updated.
    pub updated_at: Timestamp,

    /// Soft-delete tombstone; a deleted record is never physically removed.
    pub deleted_at: Option<Timestamp>,

    /// Optimistic-concurrency version, incremented on every persisted update.
    pub version: i64,
}

impl RecordMetadata {
    /// Creates metadata for a freshly constructed record.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            created_at: now,
            updated_at: now,
            deleted_at: None,
            version: 0,
        }
    }

    /// Returns true if the record carries a soft-delete tombstone.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Marks the record deleted. Idempotent; the original tombstone wins.
    pub fn mark_deleted(&mut self) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(Timestamp::now());
        }
        self.touch();
    }

    /// Refreshes the updated-at stamp.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    /// Advances the version counter after a successful persisted update.
    pub fn bump_version(&mut self) {
        self.version += 1;
        self.touch();
    }
}

impl Default for RecordMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_not_deleted() {
        let meta = RecordMetadata::new();
        assert!(!meta.is_deleted());
        assert_eq!(meta.version, 0);
    }

    #[test]
    fn mark_deleted_sets_tombstone_once() {
        let mut meta = RecordMetadata::new();
        meta.mark_deleted();
        let first = meta.deleted_at;
        assert!(meta.is_deleted());

        meta.mark_deleted();
        assert_eq!(meta.deleted_at, first);
    }

    #[test]
    fn bump_version_increments() {
        let mut meta = RecordMetadata::new();
        meta.bump_version();
        meta.bump_version();
        assert_eq!(meta.version, 2);
    }

    #[test]
    fn touch_moves_updated_at_forward() {
        let mut meta = RecordMetadata::new();
        let before = meta.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(5));
        meta.touch();
        assert!(meta.updated_at.is_after(&before));
    }
}
