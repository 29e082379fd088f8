//! # Sale Repository
//!
//! Read-side access to sales and their line items.
//!
//! Sale creation is a multi-table flow (stock decrement + sale + items +
//! optional debt) and lives in `LedgerService::create_sale`. This repository
//! only reads what that flow wrote, plus soft-delete for corrections.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukkan_core::{Sale, SaleItem};

/// Repository for sale reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, sub_customer_id, total_kurus, payment_type,
                   is_debt, status, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists the line items of a sale.
    pub async fn items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, barcode, name_snapshot,
                   unit_price_kurus, quantity, line_total_kurus
            FROM sale_items
            WHERE sale_id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists a customer's sales, newest first.
    pub async fn list_for_customer(&self, customer_id: &str, limit: u32) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, sub_customer_id, total_kurus, payment_type,
                   is_debt, status, created_at
            FROM sales
            WHERE customer_id = ?1 AND status = 'active'
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists recent sales across all customers, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, sub_customer_id, total_kurus, payment_type,
                   is_debt, status, created_at
            FROM sales
            WHERE status = 'active'
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Soft-deletes a sale record.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting sale");

        let result = sqlx::query("UPDATE sales SET status = 'deleted' WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }
}
