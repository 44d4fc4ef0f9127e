//! PostgreSQL implementation of BudgetRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::budget::{Budget, BudgetPeriod};
use crate::domain::foundation::{
    BudgetId, DepartmentId, DomainError, ErrorCode, Money, RecordMetadata, SegmentId, Timestamp,
};
use crate::ports::BudgetRepository;

use super::db_error;

/// PostgreSQL implementation of the BudgetRepository port.
///
/// `update` performs the optimistic-concurrency check with
/// `WHERE version = $expected`; zero affected rows on an existing budget
/// means a concurrent writer advanced the version first.
pub struct PostgresBudgetRepository {
    pool: PgPool,
}

impl PostgresBudgetRepository {
    /// Creates a repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BudgetRow {
    id: Uuid,
    name: String,
    segment_id: Option<Uuid>,
    department_id: Option<Uuid>,
    period: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    allocated_amount: Decimal,
    consumed_amount: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    version: i64,
}

impl TryFrom<BudgetRow> for Budget {
    type Error = DomainError;

    fn try_from(row: BudgetRow) -> Result<Self, Self::Error> {
        let money = |value: Decimal, field: &str| {
            Money::try_new(value).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid {}: {}", field, e),
                )
            })
        };
        Ok(Budget {
            id: BudgetId::from_uuid(row.id),
            name: row.name,
            segment_id: row.segment_id.map(SegmentId::from_uuid),
            department_id: row.department_id.map(DepartmentId::from_uuid),
            period: BudgetPeriod::parse(&row.period)?,
            start_date: row.start_date,
            end_date: row.end_date,
            allocated: money(row.allocated_amount, "allocated_amount")?,
            consumed: money(row.consumed_amount, "consumed_amount")?,
            is_active: row.is_active,
            meta: RecordMetadata {
                created_at: Timestamp::from_datetime(row.created_at),
                updated_at: Timestamp::from_datetime(row.updated_at),
                deleted_at: row.deleted_at.map(Timestamp::from_datetime),
                version: row.version,
            },
        })
    }
}

const SELECT_BUDGET: &str = r#"
    SELECT id, name, segment_id, department_id, period, start_date, end_date,
           allocated_amount, consumed_amount, is_active, created_at,
           updated_at, deleted_at, version
    FROM budgets
"#;

fn rows_to_budgets(rows: Vec<BudgetRow>) -> Result<Vec<Budget>, DomainError> {
    rows.into_iter().map(Budget::try_from).collect()
}

#[async_trait]
impl BudgetRepository for PostgresBudgetRepository {
    async fn insert(&self, budget: &Budget) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO budgets (
                id, name, segment_id, department_id, period, start_date,
                end_date, allocated_amount, consumed_amount, is_active,
                created_at, updated_at, deleted_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(budget.id.as_uuid())
        .bind(&budget.name)
        .bind(budget.segment_id.map(|s| *s.as_uuid()))
        .bind(budget.department_id.map(|d| *d.as_uuid()))
        .bind(budget.period.as_str())
        .bind(budget.start_date)
        .bind(budget.end_date)
        .bind(budget.allocated.amount())
        .bind(budget.consumed.amount())
        .bind(budget.is_active)
        .bind(budget.meta.created_at.as_datetime())
        .bind(budget.meta.updated_at.as_datetime())
        .bind(budget.meta.deleted_at.as_ref().map(|t| *t.as_datetime()))
        .bind(budget.meta.version)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn update(&self, budget: &Budget) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE budgets
            SET name = $2, segment_id = $3, department_id = $4, period = $5,
                start_date = $6, end_date = $7, allocated_amount = $8,
                consumed_amount = $9, is_active = $10, updated_at = $11,
                deleted_at = $12, version = version + 1
            WHERE id = $1 AND version = $13
            "#,
        )
        .bind(budget.id.as_uuid())
        .bind(&budget.name)
        .bind(budget.segment_id.map(|s| *s.as_uuid()))
        .bind(budget.department_id.map(|d| *d.as_uuid()))
        .bind(budget.period.as_str())
        .bind(budget.start_date)
        .bind(budget.end_date)
        .bind(budget.allocated.amount())
        .bind(budget.consumed.amount())
        .bind(budget.is_active)
        .bind(budget.meta.updated_at.as_datetime())
        .bind(budget.meta.deleted_at.as_ref().map(|t| *t.as_datetime()))
        .bind(budget.meta.version)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            let exists: Option<(i32,)> =
                sqlx::query_as("SELECT 1 FROM budgets WHERE id = $1 LIMIT 1")
                    .bind(budget.id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(db_error)?;

            return Err(if exists.is_some() {
                DomainError::new(
                    ErrorCode::ConcurrentModification,
                    format!("Budget {} was modified concurrently", budget.id),
                )
            } else {
                DomainError::new(
                    ErrorCode::BudgetNotFound,
                    format!("Budget not found: {}", budget.id),
                )
            });
        }
        Ok(())
    }

    async fn find_by_id(&self, id: BudgetId) -> Result<Option<Budget>, DomainError> {
        let row: Option<BudgetRow> =
            sqlx::query_as(&format!("{} WHERE id = $1 AND deleted_at IS NULL", SELECT_BUDGET))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;
        row.map(Budget::try_from).transpose()
    }

    async fn exists_by_name_period_range(
        &self,
        name: &str,
        period: BudgetPeriod,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<bool, DomainError> {
        let exists: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT 1 FROM budgets
            WHERE name = $1 AND period = $2 AND start_date = $3 AND end_date = $4
              AND deleted_at IS NULL
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(period.as_str())
        .bind(start_date)
        .bind(end_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(exists.is_some())
    }

    async fn find_active_for_segment_on(
        &self,
        segment_id: SegmentId,
        date: NaiveDate,
    ) -> Result<Vec<Budget>, DomainError> {
        let rows: Vec<BudgetRow> = sqlx::query_as(&format!(
            r#"{} WHERE segment_id = $1 AND $2 >= start_date AND $2 <= end_date
               AND is_active AND deleted_at IS NULL"#,
            SELECT_BUDGET
        ))
        .bind(segment_id.as_uuid())
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows_to_budgets(rows)
    }

    async fn find_active_for_department_on(
        &self,
        department_id: DepartmentId,
        date: NaiveDate,
    ) -> Result<Vec<Budget>, DomainError> {
        let rows: Vec<BudgetRow> = sqlx::query_as(&format!(
            r#"{} WHERE department_id = $1 AND $2 >= start_date AND $2 <= end_date
               AND is_active AND deleted_at IS NULL"#,
            SELECT_BUDGET
        ))
        .bind(department_id.as_uuid())
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows_to_budgets(rows)
    }

    async fn find_current(&self, date: NaiveDate) -> Result<Vec<Budget>, DomainError> {
        let rows: Vec<BudgetRow> = sqlx::query_as(&format!(
            "{} WHERE $1 >= start_date AND $1 <= end_date AND deleted_at IS NULL",
            SELECT_BUDGET
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows_to_budgets(rows)
    }

    async fn list_active(&self) -> Result<Vec<Budget>, DomainError> {
        let rows: Vec<BudgetRow> = sqlx::query_as(&format!(
            "{} WHERE is_active AND deleted_at IS NULL ORDER BY name",
            SELECT_BUDGET
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows_to_budgets(rows)
    }

    async fn list(&self) -> Result<Vec<Budget>, DomainError> {
        let rows: Vec<BudgetRow> = sqlx::query_as(&format!(
            "{} WHERE deleted_at IS NULL ORDER BY name",
            SELECT_BUDGET
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows_to_budgets(rows)
    }
}
