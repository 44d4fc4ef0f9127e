//! Directory port - resolution of segments, departments, users, roles.
//!
//! The core never embeds user management; it only asks an external
//! collaborator whether a referenced record exists (and is not deleted),
//! and how segments map to departments for budget scoping.

use async_trait::async_trait;

use crate::domain::foundation::{DepartmentId, DomainError, RoleId, SegmentId, UserId};

/// Lookup port for organizational reference data.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Returns true if the segment exists and is not deleted.
    async fn segment_exists(&self, id: SegmentId) -> Result<bool, DomainError>;

    /// Returns the department a segment belongs to, if mapped.
    async fn segment_department(
        &self,
        id: SegmentId,
    ) -> Result<Option<DepartmentId>, DomainError>;

    /// Returns true if the department exists and is not deleted.
    async fn department_exists(&self, id: DepartmentId) -> Result<bool, DomainError>;

    /// Returns true if the user exists and is not deleted.
    async fn user_exists(&self, id: UserId) -> Result<bool, DomainError>;

    /// Returns true if the role exists.
    async fn role_exists(&self, id: RoleId) -> Result<bool, DomainError>;

    /// Returns true if the user holds the role.
    async fn user_has_role(&self, user: UserId, role: RoleId) -> Result<bool, DomainError>;
}
