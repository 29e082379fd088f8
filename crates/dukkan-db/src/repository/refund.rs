//! # Refund Repository
//!
//! Refund rows. Creation goes through `LedgerService::record_refund` (stock
//! restore + refund row + offset payment in one transaction); this
//! repository reads them and feeds the headroom check.

use sqlx::SqlitePool;

use crate::error::DbResult;
use dukkan_core::Refund;

/// Repository for refund database operations.
#[derive(Debug, Clone)]
pub struct RefundRepository {
    pool: SqlitePool,
}

impl RefundRepository {
    /// Creates a new RefundRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RefundRepository { pool }
    }

    /// Gets a refund by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Refund>> {
        let refund = sqlx::query_as::<_, Refund>(
            r#"
            SELECT id, debt_id, customer_id, sub_customer_id, product_id,
                   barcode, quantity, refund_kurus, status, created_at
            FROM refunds
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(refund)
    }

    /// Lists refunds recorded against one debt, oldest first.
    pub async fn list_for_debt(&self, debt_id: &str) -> DbResult<Vec<Refund>> {
        let refunds = sqlx::query_as::<_, Refund>(
            r#"
            SELECT id, debt_id, customer_id, sub_customer_id, product_id,
                   barcode, quantity, refund_kurus, status, created_at
            FROM refunds
            WHERE debt_id = ?1
            ORDER BY created_at ASC
            "#,
        )
        .bind(debt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(refunds)
    }

    /// Sums completed refunds against one debt (the headroom input).
    pub async fn total_for_debt(&self, debt_id: &str) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(refund_kurus), 0)
            FROM refunds
            WHERE debt_id = ?1 AND status = 'completed'
            "#,
        )
        .bind(debt_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
