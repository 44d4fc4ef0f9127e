//! PostgreSQL implementation of WorkflowRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, RecordMetadata, RoleId, StepId, Timestamp, UserId, WorkflowId,
};
use crate::domain::workflow::{ApprovalStep, ApprovalWorkflow, StepApprover};
use crate::ports::WorkflowRepository;

use super::db_error;

/// PostgreSQL implementation of the WorkflowRepository port.
///
/// Steps are stored in `approval_steps` and replaced wholesale whenever
/// the owning workflow is saved.
pub struct PostgresWorkflowRepository {
    pool: PgPool,
}

impl PostgresWorkflowRepository {
    /// Creates a repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_steps(&self, workflow_id: Uuid) -> Result<Vec<ApprovalStep>, DomainError> {
        let rows: Vec<StepRow> = sqlx::query_as(
            r#"
            SELECT id, step_name, step_order, approver_role_id, approver_user_id,
                   is_mandatory, condition
            FROM approval_steps
            WHERE workflow_id = $1
            ORDER BY step_order
            "#,
        )
        .bind(workflow_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(ApprovalStep::try_from).collect()
    }

    async fn load(&self, row: WorkflowRow) -> Result<ApprovalWorkflow, DomainError> {
        let steps = self.load_steps(row.id).await?;
        Ok(ApprovalWorkflow {
            id: WorkflowId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            trigger_conditions: row.trigger_conditions,
            is_active: row.is_active,
            steps,
            meta: RecordMetadata {
                created_at: Timestamp::from_datetime(row.created_at),
                updated_at: Timestamp::from_datetime(row.updated_at),
                deleted_at: row.deleted_at.map(Timestamp::from_datetime),
                version: row.version,
            },
        })
    }

    async fn load_optional(
        &self,
        row: Option<WorkflowRow>,
    ) -> Result<Option<ApprovalWorkflow>, DomainError> {
        match row {
            Some(row) => Ok(Some(self.load(row).await?)),
            None => Ok(None),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WorkflowRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    trigger_conditions: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    version: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct StepRow {
    id: Uuid,
    step_name: Option<String>,
    step_order: i32,
    approver_role_id: Option<Uuid>,
    approver_user_id: Option<Uuid>,
    is_mandatory: bool,
    condition: Option<String>,
}

impl TryFrom<StepRow> for ApprovalStep {
    type Error = DomainError;

    fn try_from(row: StepRow) -> Result<Self, Self::Error> {
        let approver = match (row.approver_role_id, row.approver_user_id) {
            (Some(role), None) => StepApprover::Role(RoleId::from_uuid(role)),
            (None, Some(user)) => StepApprover::User(UserId::from_uuid(user)),
            _ => {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Step {} has no single approver", row.id),
                ));
            }
        };
        Ok(ApprovalStep {
            id: StepId::from_uuid(row.id),
            step_name: row.step_name,
            step_order: row.step_order,
            approver,
            is_mandatory: row.is_mandatory,
            condition: row.condition,
        })
    }
}

async fn write_steps(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    workflow: &ApprovalWorkflow,
) -> Result<(), DomainError> {
    sqlx::query("DELETE FROM approval_steps WHERE workflow_id = $1")
        .bind(workflow.id.as_uuid())
        .execute(&mut **tx)
        .await
        .map_err(db_error)?;

    for step in &workflow.steps {
        let (role, user) = match step.approver {
            StepApprover::Role(role) => (Some(*role.as_uuid()), None),
            StepApprover::User(user) => (None, Some(*user.as_uuid())),
        };
        sqlx::query(
            r#"
            INSERT INTO approval_steps (
                id, workflow_id, step_name, step_order, approver_role_id,
                approver_user_id, is_mandatory, condition
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(step.id.as_uuid())
        .bind(workflow.id.as_uuid())
        .bind(step.step_name.as_deref())
        .bind(step.step_order)
        .bind(role)
        .bind(user)
        .bind(step.is_mandatory)
        .bind(step.condition.as_deref())
        .execute(&mut **tx)
        .await
        .map_err(db_error)?;
    }

    Ok(())
}

const SELECT_WORKFLOW: &str = r#"
    SELECT id, name, description, trigger_conditions, is_active,
           created_at, updated_at, deleted_at, version
    FROM approval_workflows
"#;

#[async_trait]
impl WorkflowRepository for PostgresWorkflowRepository {
    async fn insert(&self, workflow: &ApprovalWorkflow) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query(
            r#"
            INSERT INTO approval_workflows (
                id, name, description, trigger_conditions, is_active,
                created_at, updated_at, deleted_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(workflow.id.as_uuid())
        .bind(&workflow.name)
        .bind(workflow.description.as_deref())
        .bind(workflow.trigger_conditions.as_deref())
        .bind(workflow.is_active)
        .bind(workflow.meta.created_at.as_datetime())
        .bind(workflow.meta.updated_at.as_datetime())
        .bind(workflow.meta.deleted_at.as_ref().map(|t| *t.as_datetime()))
        .bind(workflow.meta.version)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        write_steps(&mut tx, workflow).await?;
        tx.commit().await.map_err(db_error)
    }

    async fn update(&self, workflow: &ApprovalWorkflow) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE approval_workflows
            SET name = $2, description = $3, trigger_conditions = $4,
                is_active = $5, updated_at = $6, deleted_at = $7,
                version = version + 1
            WHERE id = $1
            "#,
        )
        .bind(workflow.id.as_uuid())
        .bind(&workflow.name)
        .bind(workflow.description.as_deref())
        .bind(workflow.trigger_conditions.as_deref())
        .bind(workflow.is_active)
        .bind(workflow.meta.updated_at.as_datetime())
        .bind(workflow.meta.deleted_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::WorkflowNotFound,
                format!("Workflow not found: {}", workflow.id),
            ));
        }

        write_steps(&mut tx, workflow).await?;
        tx.commit().await.map_err(db_error)
    }

    async fn find_by_id(&self, id: WorkflowId) -> Result<Option<ApprovalWorkflow>, DomainError> {
        let row: Option<WorkflowRow> =
            sqlx::query_as(&format!("{} WHERE id = $1 AND deleted_at IS NULL", SELECT_WORKFLOW))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;
        self.load_optional(row).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApprovalWorkflow>, DomainError> {
        let row: Option<WorkflowRow> = sqlx::query_as(&format!(
            "{} WHERE name = $1 AND deleted_at IS NULL",
            SELECT_WORKFLOW
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        self.load_optional(row).await
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, DomainError> {
        let exists: Option<(i32,)> = sqlx::query_as(
            "SELECT 1 FROM approval_workflows WHERE name = $1 AND deleted_at IS NULL LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(exists.is_some())
    }

    async fn find_by_step(
        &self,
        step_id: StepId,
    ) -> Result<Option<ApprovalWorkflow>, DomainError> {
        let row: Option<WorkflowRow> = sqlx::query_as(&format!(
            r#"{} WHERE deleted_at IS NULL
               AND id = (SELECT workflow_id FROM approval_steps WHERE id = $1)"#,
            SELECT_WORKFLOW
        ))
        .bind(step_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        self.load_optional(row).await
    }

    async fn list_active(&self) -> Result<Vec<ApprovalWorkflow>, DomainError> {
        let rows: Vec<WorkflowRow> = sqlx::query_as(&format!(
            "{} WHERE is_active AND deleted_at IS NULL ORDER BY name",
            SELECT_WORKFLOW
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut workflows = Vec::with_capacity(rows.len());
        for row in rows {
            workflows.push(self.load(row).await?);
        }
        Ok(workflows)
    }

    async fn list(&self) -> Result<Vec<ApprovalWorkflow>, DomainError> {
        let rows: Vec<WorkflowRow> = sqlx::query_as(&format!(
            "{} WHERE deleted_at IS NULL ORDER BY name",
            SELECT_WORKFLOW
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut workflows = Vec::with_capacity(rows.len());
        for row in rows {
            workflows.push(self.load(row).await?);
        }
        Ok(workflows)
    }
}
