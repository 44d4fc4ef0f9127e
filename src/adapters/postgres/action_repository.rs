//! PostgreSQL implementation of ApprovalActionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ExpenseId, StepId, Timestamp, UserId};
use crate::domain::workflow::{ApprovalAction, ApprovalActionKind, WorkflowError};
use crate::ports::ApprovalActionRepository;

use super::db_error;

/// PostgreSQL implementation of the append-only action log.
pub struct PostgresActionRepository {
    pool: PgPool,
}

impl PostgresActionRepository {
    /// Creates a repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ActionRow {
    id: Uuid,
    expense_id: Uuid,
    step_id: Option<Uuid>,
    approver_id: Uuid,
    action: String,
    comment: Option<String>,
    delegated_to: Option<Uuid>,
    action_date: DateTime<Utc>,
}

impl TryFrom<ActionRow> for ApprovalAction {
    type Error = DomainError;

    fn try_from(row: ActionRow) -> Result<Self, Self::Error> {
        let kind = ApprovalActionKind::parse(&row.action)
            .map_err(|e: WorkflowError| DomainError::from(e))?;
        Ok(ApprovalAction {
            id: row.id,
            expense_id: ExpenseId::from_uuid(row.expense_id),
            step_id: row.step_id.map(StepId::from_uuid),
            approver: UserId::from_uuid(row.approver_id),
            kind,
            comment: row.comment,
            delegated_to: row.delegated_to.map(UserId::from_uuid),
            action_date: Timestamp::from_datetime(row.action_date),
        })
    }
}

const SELECT_ACTION: &str = r#"
    SELECT id, expense_id, step_id, approver_id, action, comment,
           delegated_to, action_date
    FROM approval_actions
"#;

fn rows_to_actions(rows: Vec<ActionRow>) -> Result<Vec<ApprovalAction>, DomainError> {
    rows.into_iter().map(ApprovalAction::try_from).collect()
}

#[async_trait]
impl ApprovalActionRepository for PostgresActionRepository {
    async fn append(&self, action: &ApprovalAction) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO approval_actions (
                id, expense_id, step_id, approver_id, action, comment,
                delegated_to, action_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(action.id)
        .bind(action.expense_id.as_uuid())
        .bind(action.step_id.map(|s| *s.as_uuid()))
        .bind(action.approver.as_uuid())
        .bind(action.kind.as_str())
        .bind(action.comment.as_deref())
        .bind(action.delegated_to.map(|u| *u.as_uuid()))
        .bind(action.action_date.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn find_by_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Vec<ApprovalAction>, DomainError> {
        let rows: Vec<ActionRow> = sqlx::query_as(&format!(
            "{} WHERE expense_id = $1 ORDER BY action_date DESC",
            SELECT_ACTION
        ))
        .bind(expense_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows_to_actions(rows)
    }

    async fn latest_for_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Option<ApprovalAction>, DomainError> {
        let row: Option<ActionRow> = sqlx::query_as(&format!(
            "{} WHERE expense_id = $1 ORDER BY action_date DESC LIMIT 1",
            SELECT_ACTION
        ))
        .bind(expense_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        row.map(ApprovalAction::try_from).transpose()
    }

    async fn find_by_approver(
        &self,
        approver: UserId,
    ) -> Result<Vec<ApprovalAction>, DomainError> {
        let rows: Vec<ActionRow> = sqlx::query_as(&format!(
            "{} WHERE approver_id = $1 ORDER BY action_date DESC",
            SELECT_ACTION
        ))
        .bind(approver.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows_to_actions(rows)
    }

    async fn has_approved_at_step(
        &self,
        expense_id: ExpenseId,
        step_id: StepId,
    ) -> Result<bool, DomainError> {
        let exists: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT 1 FROM approval_actions
            WHERE expense_id = $1 AND step_id = $2 AND action = 'APPROVED'
            LIMIT 1
            "#,
        )
        .bind(expense_id.as_uuid())
        .bind(step_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(exists.is_some())
    }

    async fn count_by_approver_and_kind(
        &self,
        approver: UserId,
        kind: ApprovalActionKind,
    ) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM approval_actions WHERE approver_id = $1 AND action = $2",
        )
        .bind(approver.as_uuid())
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(count as u64)
    }

    async fn find_delegations_to(
        &self,
        user: UserId,
    ) -> Result<Vec<ApprovalAction>, DomainError> {
        let rows: Vec<ActionRow> = sqlx::query_as(&format!(
            "{} WHERE action = 'DELEGATED' AND delegated_to = $1 ORDER BY action_date DESC",
            SELECT_ACTION
        ))
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows_to_actions(rows)
    }
}
