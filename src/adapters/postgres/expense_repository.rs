//! PostgreSQL implementation of ExpenseRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::expense::{Document, Expense, ExpenseStatus, SegmentAllocation};
use crate::domain::foundation::{
    DomainError, ErrorCode, ExpenseId, Money, Percentage, RecordMetadata, SegmentId, Timestamp,
    UserId,
};
use crate::ports::ExpenseRepository;

use super::db_error;

/// PostgreSQL implementation of the ExpenseRepository port.
///
/// The expense row and its allocation/document child rows are written in
/// one transaction; updates replace the child rows wholesale.
pub struct PostgresExpenseRepository {
    pool: PgPool,
}

impl PostgresExpenseRepository {
    /// Creates a repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_children(&self, row: ExpenseRow) -> Result<Expense, DomainError> {
        let allocations: Vec<AllocationRow> = sqlx::query_as(
            r#"
            SELECT id, segment_id, amount, percentage, description
            FROM segment_allocations
            WHERE expense_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let documents: Vec<DocumentRow> = sqlx::query_as(
            r#"
            SELECT id, file_name, content_type, storage_key, uploaded_at
            FROM documents
            WHERE expense_id = $1
            ORDER BY uploaded_at
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let allocations = allocations
            .into_iter()
            .map(SegmentAllocation::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let documents = documents.into_iter().map(Document::from).collect();

        Expense::try_from((row, allocations, documents))
    }

    async fn load_all(&self, rows: Vec<ExpenseRow>) -> Result<Vec<Expense>, DomainError> {
        let mut expenses = Vec::with_capacity(rows.len());
        for row in rows {
            expenses.push(self.load_children(row).await?);
        }
        Ok(expenses)
    }
}

/// Database row representation of an expense.
#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: Uuid,
    submitter_id: Uuid,
    expense_date: NaiveDate,
    vendor: Option<String>,
    total_amount: Decimal,
    currency: String,
    description: Option<String>,
    status: String,
    submission_date: Option<NaiveDate>,
    approval_date: Option<NaiveDate>,
    payment_date: Option<NaiveDate>,
    payment_reference: Option<String>,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    version: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct AllocationRow {
    id: Uuid,
    segment_id: Uuid,
    amount: Decimal,
    percentage: Decimal,
    description: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    file_name: String,
    content_type: String,
    storage_key: String,
    uploaded_at: DateTime<Utc>,
}

impl TryFrom<AllocationRow> for SegmentAllocation {
    type Error = DomainError;

    fn try_from(row: AllocationRow) -> Result<Self, Self::Error> {
        Ok(SegmentAllocation {
            id: row.id,
            segment_id: SegmentId::from_uuid(row.segment_id),
            amount: Money::try_new(row.amount).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid amount: {}", e))
            })?,
            percentage: Percentage::try_new(row.percentage).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid percentage: {}", e))
            })?,
            description: row.description,
        })
    }
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            file_name: row.file_name,
            content_type: row.content_type,
            storage_key: row.storage_key,
            uploaded_at: Timestamp::from_datetime(row.uploaded_at),
        }
    }
}

impl TryFrom<(ExpenseRow, Vec<SegmentAllocation>, Vec<Document>)> for Expense {
    type Error = DomainError;

    fn try_from(
        (row, allocations, documents): (ExpenseRow, Vec<SegmentAllocation>, Vec<Document>),
    ) -> Result<Self, Self::Error> {
        Ok(Expense {
            id: ExpenseId::from_uuid(row.id),
            submitter: UserId::from_uuid(row.submitter_id),
            expense_date: row.expense_date,
            vendor: row.vendor,
            total_amount: Money::try_new(row.total_amount).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid amount: {}", e))
            })?,
            currency: row.currency,
            description: row.description,
            status: ExpenseStatus::parse(&row.status)?,
            submission_date: row.submission_date,
            approval_date: row.approval_date,
            payment_date: row.payment_date,
            payment_reference: row.payment_reference,
            rejection_reason: row.rejection_reason,
            allocations,
            documents,
            meta: RecordMetadata {
                created_at: Timestamp::from_datetime(row.created_at),
                updated_at: Timestamp::from_datetime(row.updated_at),
                deleted_at: row.deleted_at.map(Timestamp::from_datetime),
                version: row.version,
            },
        })
    }
}

async fn write_children(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    expense: &Expense,
) -> Result<(), DomainError> {
    sqlx::query("DELETE FROM segment_allocations WHERE expense_id = $1")
        .bind(expense.id.as_uuid())
        .execute(&mut **tx)
        .await
        .map_err(db_error)?;

    for allocation in &expense.allocations {
        sqlx::query(
            r#"
            INSERT INTO segment_allocations (
                id, expense_id, segment_id, amount, percentage, description, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, NOW())
            "#,
        )
        .bind(allocation.id)
        .bind(expense.id.as_uuid())
        .bind(allocation.segment_id.as_uuid())
        .bind(allocation.amount.amount())
        .bind(allocation.percentage.value())
        .bind(allocation.description.as_deref())
        .execute(&mut **tx)
        .await
        .map_err(db_error)?;
    }

    sqlx::query("DELETE FROM documents WHERE expense_id = $1")
        .bind(expense.id.as_uuid())
        .execute(&mut **tx)
        .await
        .map_err(db_error)?;

    for document in &expense.documents {
        sqlx::query(
            r#"
            INSERT INTO documents (
                id, expense_id, file_name, content_type, storage_key, uploaded_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(document.id)
        .bind(expense.id.as_uuid())
        .bind(&document.file_name)
        .bind(&document.content_type)
        .bind(&document.storage_key)
        .bind(document.uploaded_at.as_datetime())
        .execute(&mut **tx)
        .await
        .map_err(db_error)?;
    }

    Ok(())
}

const SELECT_EXPENSE: &str = r#"
    SELECT id, submitter_id, expense_date, vendor, total_amount, currency,
           description, status, submission_date, approval_date, payment_date,
           payment_reference, rejection_reason, created_at, updated_at,
           deleted_at, version
    FROM expenses
"#;

#[async_trait]
impl ExpenseRepository for PostgresExpenseRepository {
    async fn insert(&self, expense: &Expense) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query(
            r#"
            INSERT INTO expenses (
                id, submitter_id, expense_date, vendor, total_amount, currency,
                description, status, submission_date, approval_date, payment_date,
                payment_reference, rejection_reason, created_at, updated_at,
                deleted_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                      $14, $15, $16, $17)
            "#,
        )
        .bind(expense.id.as_uuid())
        .bind(expense.submitter.as_uuid())
        .bind(expense.expense_date)
        .bind(expense.vendor.as_deref())
        .bind(expense.total_amount.amount())
        .bind(&expense.currency)
        .bind(expense.description.as_deref())
        .bind(expense.status.as_str())
        .bind(expense.submission_date)
        .bind(expense.approval_date)
        .bind(expense.payment_date)
        .bind(expense.payment_reference.as_deref())
        .bind(expense.rejection_reason.as_deref())
        .bind(expense.meta.created_at.as_datetime())
        .bind(expense.meta.updated_at.as_datetime())
        .bind(expense.meta.deleted_at.as_ref().map(|t| *t.as_datetime()))
        .bind(expense.meta.version)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        write_children(&mut tx, expense).await?;
        tx.commit().await.map_err(db_error)
    }

    async fn update(&self, expense: &Expense) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET expense_date = $2, vendor = $3, total_amount = $4, currency = $5,
                description = $6, status = $7, submission_date = $8,
                approval_date = $9, payment_date = $10, payment_reference = $11,
                rejection_reason = $12, updated_at = $13, deleted_at = $14,
                version = version + 1
            WHERE id = $1
            "#,
        )
        .bind(expense.id.as_uuid())
        .bind(expense.expense_date)
        .bind(expense.vendor.as_deref())
        .bind(expense.total_amount.amount())
        .bind(&expense.currency)
        .bind(expense.description.as_deref())
        .bind(expense.status.as_str())
        .bind(expense.submission_date)
        .bind(expense.approval_date)
        .bind(expense.payment_date)
        .bind(expense.payment_reference.as_deref())
        .bind(expense.rejection_reason.as_deref())
        .bind(expense.meta.updated_at.as_datetime())
        .bind(expense.meta.deleted_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ExpenseNotFound,
                format!("Expense not found: {}", expense.id),
            ));
        }

        write_children(&mut tx, expense).await?;
        tx.commit().await.map_err(db_error)
    }

    async fn find_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, DomainError> {
        let row: Option<ExpenseRow> =
            sqlx::query_as(&format!("{} WHERE id = $1 AND deleted_at IS NULL", SELECT_EXPENSE))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        match row {
            Some(row) => Ok(Some(self.load_children(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_submitter(&self, submitter: UserId) -> Result<Vec<Expense>, DomainError> {
        let rows: Vec<ExpenseRow> = sqlx::query_as(&format!(
            "{} WHERE submitter_id = $1 AND deleted_at IS NULL ORDER BY expense_date DESC",
            SELECT_EXPENSE
        ))
        .bind(submitter.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        self.load_all(rows).await
    }

    async fn find_by_status(&self, status: ExpenseStatus) -> Result<Vec<Expense>, DomainError> {
        let rows: Vec<ExpenseRow> = sqlx::query_as(&format!(
            "{} WHERE status = $1 AND deleted_at IS NULL ORDER BY expense_date DESC",
            SELECT_EXPENSE
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        self.load_all(rows).await
    }

    async fn list(&self) -> Result<Vec<Expense>, DomainError> {
        let rows: Vec<ExpenseRow> = sqlx::query_as(&format!(
            "{} WHERE deleted_at IS NULL ORDER BY expense_date DESC",
            SELECT_EXPENSE
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        self.load_all(rows).await
    }
}
