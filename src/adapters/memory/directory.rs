//! In-memory directory of segments, departments, users, and roles.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DepartmentId, DomainError, RoleId, SegmentId, UserId};
use crate::ports::Directory;

#[derive(Debug, Default)]
struct DirectoryState {
    segments: HashMap<SegmentId, Option<DepartmentId>>,
    departments: HashSet<DepartmentId>,
    users: HashSet<UserId>,
    roles: HashSet<RoleId>,
    memberships: HashSet<(UserId, RoleId)>,
}

/// In-memory directory seeded through the `register_*` methods.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a segment, optionally mapped to a department.
    pub async fn register_segment(&self, id: SegmentId, department: Option<DepartmentId>) {
        let mut state = self.state.write().await;
        if let Some(dept) = department {
            state.departments.insert(dept);
        }
        state.segments.insert(id, department);
    }

    /// Registers a department.
    pub async fn register_department(&self, id: DepartmentId) {
        self.state.write().await.departments.insert(id);
    }

    /// Registers a user.
    pub async fn register_user(&self, id: UserId) {
        self.state.write().await.users.insert(id);
    }

    /// Registers a role.
    pub async fn register_role(&self, id: RoleId) {
        self.state.write().await.roles.insert(id);
    }

    /// Grants a role to a user, registering both.
    pub async fn grant_role(&self, user: UserId, role: RoleId) {
        let mut state = self.state.write().await;
        state.users.insert(user);
        state.roles.insert(role);
        state.memberships.insert((user, role));
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn segment_exists(&self, id: SegmentId) -> Result<bool, DomainError> {
        Ok(self.state.read().await.segments.contains_key(&id))
    }

    async fn segment_department(
        &self,
        id: SegmentId,
    ) -> Result<Option<DepartmentId>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .segments
            .get(&id)
            .copied()
            .flatten())
    }

    async fn department_exists(&self, id: DepartmentId) -> Result<bool, DomainError> {
        Ok(self.state.read().await.departments.contains(&id))
    }

    async fn user_exists(&self, id: UserId) -> Result<bool, DomainError> {
        Ok(self.state.read().await.users.contains(&id))
    }

    async fn role_exists(&self, id: RoleId) -> Result<bool, DomainError> {
        Ok(self.state.read().await.roles.contains(&id))
    }

    async fn user_has_role(&self, user: UserId, role: RoleId) -> Result<bool, DomainError> {
        Ok(self.state.read().await.memberships.contains(&(user, role)))
    }
}
