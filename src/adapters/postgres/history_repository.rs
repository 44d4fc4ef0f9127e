//! PostgreSQL implementation of WorkflowHistoryRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::expense::ExpenseStatus;
use crate::domain::foundation::{DomainError, ExpenseId, HistoryId, Timestamp, UserId};
use crate::domain::workflow::WorkflowHistory;
use crate::ports::WorkflowHistoryRepository;

use super::db_error;

/// PostgreSQL implementation of the append-only transition audit trail.
pub struct PostgresHistoryRepository {
    pool: PgPool,
}

impl PostgresHistoryRepository {
    /// Creates a repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    expense_id: Uuid,
    from_status: Option<String>,
    to_status: String,
    actor_id: Uuid,
    comment: Option<String>,
    recorded_at: DateTime<Utc>,
}

impl TryFrom<HistoryRow> for WorkflowHistory {
    type Error = DomainError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        Ok(WorkflowHistory {
            id: HistoryId::from_uuid(row.id),
            expense_id: ExpenseId::from_uuid(row.expense_id),
            from_status: row
                .from_status
                .as_deref()
                .map(ExpenseStatus::parse)
                .transpose()?,
            to_status: ExpenseStatus::parse(&row.to_status)?,
            actor: UserId::from_uuid(row.actor_id),
            comment: row.comment,
            timestamp: Timestamp::from_datetime(row.recorded_at),
        })
    }
}

const SELECT_HISTORY: &str = r#"
    SELECT id, expense_id, from_status, to_status, actor_id, comment, recorded_at
    FROM workflow_history
"#;

fn rows_to_history(rows: Vec<HistoryRow>) -> Result<Vec<WorkflowHistory>, DomainError> {
    rows.into_iter().map(WorkflowHistory::try_from).collect()
}

#[async_trait]
impl WorkflowHistoryRepository for PostgresHistoryRepository {
    async fn append(&self, record: &WorkflowHistory) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO workflow_history (
                id, expense_id, from_status, to_status, actor_id, comment, recorded_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.expense_id.as_uuid())
        .bind(record.from_status.map(|s| s.as_str()))
        .bind(record.to_status.as_str())
        .bind(record.actor.as_uuid())
        .bind(record.comment.as_deref())
        .bind(record.timestamp.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn find_by_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Vec<WorkflowHistory>, DomainError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(&format!(
            "{} WHERE expense_id = $1 ORDER BY recorded_at DESC",
            SELECT_HISTORY
        ))
        .bind(expense_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows_to_history(rows)
    }

    async fn latest_for_expense(
        &self,
        expense_id: ExpenseId,
    ) -> Result<Option<WorkflowHistory>, DomainError> {
        let row: Option<HistoryRow> = sqlx::query_as(&format!(
            "{} WHERE expense_id = $1 ORDER BY recorded_at DESC LIMIT 1",
            SELECT_HISTORY
        ))
        .bind(expense_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        row.map(WorkflowHistory::try_from).transpose()
    }

    async fn find_by_actor(&self, actor: UserId) -> Result<Vec<WorkflowHistory>, DomainError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(&format!(
            "{} WHERE actor_id = $1 ORDER BY recorded_at DESC",
            SELECT_HISTORY
        ))
        .bind(actor.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows_to_history(rows)
    }
}
