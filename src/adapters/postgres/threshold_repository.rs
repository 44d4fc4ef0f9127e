//! PostgreSQL implementation of ThresholdRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::budget::BudgetThreshold;
use crate::domain::foundation::{
    BudgetId, DomainError, ErrorCode, Percentage, RecordMetadata, ThresholdId, Timestamp, UserId,
};
use crate::ports::ThresholdRepository;

use super::db_error;

/// PostgreSQL implementation of the ThresholdRepository port.
///
/// Notification recipients live in `threshold_recipients` and are
/// replaced together with the threshold row.
pub struct PostgresThresholdRepository {
    pool: PgPool,
}

impl PostgresThresholdRepository {
    /// Creates a repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_recipients(&self, threshold_id: Uuid) -> Result<Vec<UserId>, DomainError> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM threshold_recipients WHERE threshold_id = $1")
                .bind(threshold_id)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;
        Ok(rows.into_iter().map(|(id,)| UserId::from_uuid(id)).collect())
    }

    async fn load(&self, row: ThresholdRow) -> Result<BudgetThreshold, DomainError> {
        let recipients = self.load_recipients(row.id).await?;
        Ok(BudgetThreshold {
            id: ThresholdId::from_uuid(row.id),
            budget_id: BudgetId::from_uuid(row.budget_id),
            percentage: Percentage::try_new(row.percentage).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid percentage: {}", e))
            })?,
            alert_enabled: row.alert_enabled,
            notification_recipients: recipients,
            meta: RecordMetadata {
                created_at: Timestamp::from_datetime(row.created_at),
                updated_at: Timestamp::from_datetime(row.updated_at),
                deleted_at: None,
                version: row.version,
            },
        })
    }

    async fn load_all(&self, rows: Vec<ThresholdRow>) -> Result<Vec<BudgetThreshold>, DomainError> {
        let mut thresholds = Vec::with_capacity(rows.len());
        for row in rows {
            thresholds.push(self.load(row).await?);
        }
        Ok(thresholds)
    }

    async fn write_recipients(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        threshold: &BudgetThreshold,
    ) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM threshold_recipients WHERE threshold_id = $1")
            .bind(threshold.id.as_uuid())
            .execute(&mut **tx)
            .await
            .map_err(db_error)?;

        for recipient in &threshold.notification_recipients {
            sqlx::query(
                "INSERT INTO threshold_recipients (threshold_id, user_id) VALUES ($1, $2)",
            )
            .bind(threshold.id.as_uuid())
            .bind(recipient.as_uuid())
            .execute(&mut **tx)
            .await
            .map_err(db_error)?;
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ThresholdRow {
    id: Uuid,
    budget_id: Uuid,
    percentage: Decimal,
    alert_enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

const SELECT_THRESHOLD: &str = r#"
    SELECT id, budget_id, percentage, alert_enabled, created_at, updated_at, version
    FROM budget_thresholds
"#;

#[async_trait]
impl ThresholdRepository for PostgresThresholdRepository {
    async fn insert(&self, threshold: &BudgetThreshold) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query(
            r#"
            INSERT INTO budget_thresholds (
                id, budget_id, percentage, alert_enabled, created_at, updated_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(threshold.id.as_uuid())
        .bind(threshold.budget_id.as_uuid())
        .bind(threshold.percentage.value())
        .bind(threshold.alert_enabled)
        .bind(threshold.meta.created_at.as_datetime())
        .bind(threshold.meta.updated_at.as_datetime())
        .bind(threshold.meta.version)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        Self::write_recipients(&mut tx, threshold).await?;
        tx.commit().await.map_err(db_error)
    }

    async fn update(&self, threshold: &BudgetThreshold) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE budget_thresholds
            SET percentage = $2, alert_enabled = $3, updated_at = $4,
                version = version + 1
            WHERE id = $1
            "#,
        )
        .bind(threshold.id.as_uuid())
        .bind(threshold.percentage.value())
        .bind(threshold.alert_enabled)
        .bind(threshold.meta.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ThresholdNotFound,
                format!("Threshold not found: {}", threshold.id),
            ));
        }

        Self::write_recipients(&mut tx, threshold).await?;
        tx.commit().await.map_err(db_error)
    }

    async fn find_by_id(&self, id: ThresholdId) -> Result<Option<BudgetThreshold>, DomainError> {
        let row: Option<ThresholdRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_THRESHOLD))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;
        match row {
            Some(row) => Ok(Some(self.load(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_budget(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<BudgetThreshold>, DomainError> {
        let rows: Vec<ThresholdRow> = sqlx::query_as(&format!(
            "{} WHERE budget_id = $1 ORDER BY percentage",
            SELECT_THRESHOLD
        ))
        .bind(budget_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        self.load_all(rows).await
    }

    async fn find_enabled(&self) -> Result<Vec<BudgetThreshold>, DomainError> {
        let rows: Vec<ThresholdRow> = sqlx::query_as(&format!(
            "{} WHERE alert_enabled ORDER BY budget_id, percentage",
            SELECT_THRESHOLD
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        self.load_all(rows).await
    }

    async fn exists_by_budget_and_percentage(
        &self,
        budget_id: BudgetId,
        percentage: Decimal,
    ) -> Result<bool, DomainError> {
        let exists: Option<(i32,)> = sqlx::query_as(
            "SELECT 1 FROM budget_thresholds WHERE budget_id = $1 AND percentage = $2 LIMIT 1",
        )
        .bind(budget_id.as_uuid())
        .bind(percentage)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(exists.is_some())
    }

    async fn delete(&self, id: ThresholdId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM budget_thresholds WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
