//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Transaction, TransactionPatch, TransactionStatus};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

/// Postgres-backed transaction store, keyed by `ref_id`.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn insert(&self, tx: &Transaction) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            INSERT INTO transactions (
                id, ref_id, product_name, details, cost_price, selling_price,
                status, serial_number, failure_reason, provider_trx_id,
                initiated_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(tx.id)
        .bind(&tx.ref_id)
        .bind(&tx.product_name)
        .bind(&tx.details)
        .bind(tx.cost_price)
        .bind(tx.selling_price)
        .bind(tx.status.as_str())
        .bind(&tx.serial_number)
        .bind(&tx.failure_reason)
        .bind(&tx.provider_trx_id)
        .bind(&tx.initiated_by)
        .bind(tx.created_at)
        .bind(tx.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.into_domain()
    }

    async fn get_by_ref_id(&self, ref_id: &str) -> RepositoryResult<Option<Transaction>> {
        let row =
            sqlx::query_as::<_, TransactionRow>("SELECT * FROM transactions WHERE ref_id = $1")
                .bind(ref_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(RepositoryError::from)?;

        row.map(|r| r.into_domain()).transpose()
    }

    async fn apply_patch(
        &self,
        ref_id: &str,
        patch: &TransactionPatch,
    ) -> RepositoryResult<Transaction> {
        // Single-statement read-modify-write; COALESCE keeps stored values
        // for fields the envelope did not supply.
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            UPDATE transactions SET
                status = $2,
                serial_number = COALESCE($3, serial_number),
                failure_reason = COALESCE($4, failure_reason),
                provider_trx_id = COALESCE($5, provider_trx_id),
                cost_price = COALESCE($6, cost_price),
                updated_at = NOW()
            WHERE ref_id = $1
            RETURNING *
            "#,
        )
        .bind(ref_id)
        .bind(patch.status.as_str())
        .bind(&patch.serial_number)
        .bind(&patch.failure_reason)
        .bind(&patch.provider_trx_id)
        .bind(patch.cost_price)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.into_domain()
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;
        Ok(())
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    ref_id: String,
    product_name: String,
    details: String,
    cost_price: i64,
    selling_price: i64,
    status: String,
    serial_number: Option<String>,
    failure_reason: Option<String>,
    provider_trx_id: Option<String>,
    initiated_by: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<Transaction> {
        let status = TransactionStatus::parse(&self.status).ok_or_else(|| {
            RepositoryError::Corrupt(self.ref_id.clone(), format!("status `{}`", self.status))
        })?;

        Ok(Transaction {
            id: self.id,
            ref_id: self.ref_id,
            product_name: self.product_name,
            details: self.details,
            cost_price: self.cost_price,
            selling_price: self.selling_price,
            status,
            serial_number: self.serial_number,
            failure_reason: self.failure_reason,
            provider_trx_id: self.provider_trx_id,
            initiated_by: self.initiated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
