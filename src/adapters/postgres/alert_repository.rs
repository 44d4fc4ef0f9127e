//! PostgreSQL implementation of AlertRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::budget::BudgetAlert;
use crate::domain::foundation::{AlertId, BudgetId, DomainError, ThresholdId, Timestamp};
use crate::ports::AlertRepository;

use super::db_error;

/// PostgreSQL implementation of the AlertRepository port.
///
/// The conditional insert runs check and insert in one statement, and a
/// partial unique index on `(budget_id, threshold_id) WHERE NOT
/// acknowledged` backstops the invariant against concurrent sweeps.
pub struct PostgresAlertRepository {
    pool: PgPool,
}

impl PostgresAlertRepository {
    /// Creates a repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AlertRow {
    id: Uuid,
    budget_id: Uuid,
    threshold_id: Uuid,
    triggered_date: DateTime<Utc>,
    message: String,
    acknowledged: bool,
    acknowledged_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<AlertRow> for BudgetAlert {
    fn from(row: AlertRow) -> Self {
        BudgetAlert {
            id: AlertId::from_uuid(row.id),
            budget_id: BudgetId::from_uuid(row.budget_id),
            threshold_id: ThresholdId::from_uuid(row.threshold_id),
            triggered_date: Timestamp::from_datetime(row.triggered_date),
            message: row.message,
            acknowledged: row.acknowledged,
            acknowledged_date: row.acknowledged_date.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

const SELECT_ALERT: &str = r#"
    SELECT id, budget_id, threshold_id, triggered_date, message,
           acknowledged, acknowledged_date, created_at
    FROM budget_alerts
"#;

#[async_trait]
impl AlertRepository for PostgresAlertRepository {
    async fn insert_if_none_unacknowledged(
        &self,
        alert: &BudgetAlert,
    ) -> Result<bool, DomainError> {
        // ON CONFLICT over the partial unique index turns a concurrent
        // duplicate into a no-op instead of an error.
        let result = sqlx::query(
            r#"
            INSERT INTO budget_alerts (
                id, budget_id, threshold_id, triggered_date, message,
                acknowledged, acknowledged_date, created_at
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            WHERE NOT EXISTS (
                SELECT 1 FROM budget_alerts
                WHERE budget_id = $2 AND threshold_id = $3 AND NOT acknowledged
            )
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(alert.id.as_uuid())
        .bind(alert.budget_id.as_uuid())
        .bind(alert.threshold_id.as_uuid())
        .bind(alert.triggered_date.as_datetime())
        .bind(&alert.message)
        .bind(alert.acknowledged)
        .bind(alert.acknowledged_date.as_ref().map(|t| *t.as_datetime()))
        .bind(alert.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update(&self, alert: &BudgetAlert) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE budget_alerts
            SET acknowledged = $2, acknowledged_date = $3
            WHERE id = $1
            "#,
        )
        .bind(alert.id.as_uuid())
        .bind(alert.acknowledged)
        .bind(alert.acknowledged_date.as_ref().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: AlertId) -> Result<Option<BudgetAlert>, DomainError> {
        let row: Option<AlertRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_ALERT))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.map(BudgetAlert::from))
    }

    async fn unacknowledged_exists(
        &self,
        budget_id: BudgetId,
        threshold_id: ThresholdId,
    ) -> Result<bool, DomainError> {
        let exists: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT 1 FROM budget_alerts
            WHERE budget_id = $1 AND threshold_id = $2 AND NOT acknowledged
            LIMIT 1
            "#,
        )
        .bind(budget_id.as_uuid())
        .bind(threshold_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(exists.is_some())
    }

    async fn find_unacknowledged(&self) -> Result<Vec<BudgetAlert>, DomainError> {
        let rows: Vec<AlertRow> = sqlx::query_as(&format!(
            "{} WHERE NOT acknowledged ORDER BY triggered_date DESC",
            SELECT_ALERT
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(BudgetAlert::from).collect())
    }

    async fn find_by_budget(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<BudgetAlert>, DomainError> {
        let rows: Vec<AlertRow> = sqlx::query_as(&format!(
            "{} WHERE budget_id = $1 ORDER BY triggered_date DESC",
            SELECT_ALERT
        ))
        .bind(budget_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(BudgetAlert::from).collect())
    }

    async fn find_triggered_since(
        &self,
        since: Timestamp,
    ) -> Result<Vec<BudgetAlert>, DomainError> {
        let rows: Vec<AlertRow> = sqlx::query_as(&format!(
            "{} WHERE triggered_date >= $1 ORDER BY triggered_date DESC",
            SELECT_ALERT
        ))
        .bind(since.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(BudgetAlert::from).collect())
    }

    async fn delete_acknowledged(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM budget_alerts WHERE acknowledged")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected())
    }

    async fn delete_triggered_before(&self, before: Timestamp) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM budget_alerts WHERE triggered_date < $1")
            .bind(before.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected())
    }
}
