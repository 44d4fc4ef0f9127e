//! PostgreSQL implementation of the Directory port.
//!
//! Reads the organizational reference tables owned by the surrounding
//! platform (users, roles, departments, segments).

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DepartmentId, DomainError, RoleId, SegmentId, UserId};
use crate::ports::Directory;

use super::db_error;

/// PostgreSQL implementation of the Directory port.
pub struct PostgresDirectory {
    pool: PgPool,
}

impl PostgresDirectory {
    /// Creates a directory over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, query: &str, id: Uuid) -> Result<bool, DomainError> {
        let row: Option<(i32,)> = sqlx::query_as(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl Directory for PostgresDirectory {
    async fn segment_exists(&self, id: SegmentId) -> Result<bool, DomainError> {
        self.exists(
            "SELECT 1 FROM segments WHERE id = $1 AND deleted_at IS NULL LIMIT 1",
            *id.as_uuid(),
        )
        .await
    }

    async fn segment_department(
        &self,
        id: SegmentId,
    ) -> Result<Option<DepartmentId>, DomainError> {
        let row: Option<(Option<Uuid>,)> = sqlx::query_as(
            "SELECT department_id FROM segments WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.and_then(|(dept,)| dept).map(DepartmentId::from_uuid))
    }

    async fn department_exists(&self, id: DepartmentId) -> Result<bool, DomainError> {
        self.exists(
            "SELECT 1 FROM departments WHERE id = $1 AND deleted_at IS NULL LIMIT 1",
            *id.as_uuid(),
        )
        .await
    }

    async fn user_exists(&self, id: UserId) -> Result<bool, DomainError> {
        self.exists(
            "SELECT 1 FROM users WHERE id = $1 AND deleted_at IS NULL LIMIT 1",
            *id.as_uuid(),
        )
        .await
    }

    async fn role_exists(&self, id: RoleId) -> Result<bool, DomainError> {
        self.exists("SELECT 1 FROM roles WHERE id = $1 LIMIT 1", *id.as_uuid())
            .await
    }

    async fn user_has_role(&self, user: UserId, role: RoleId) -> Result<bool, DomainError> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT 1 FROM user_roles WHERE user_id = $1 AND role_id = $2 LIMIT 1",
        )
        .bind(user.as_uuid())
        .bind(role.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.is_some())
    }
}
