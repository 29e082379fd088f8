//! # Payment Repository
//!
//! Payment rows and the ledger totals that drive refund reconciliation.
//!
//! ## Two Row Shapes
//! ```text
//! Regular payment:  amount_kurus > 0,  refund_amount_kurus = 0
//! Refund offset:    amount_kurus = 0,  refund_amount_kurus > 0,
//!                   description "Geri Ödeme"
//! ```
//!
//! `totals()` sums both columns over active rows; the difference
//! (paid − refunded) is the customer's net paid-in, which decides whether
//! a refund closes the account.

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukkan_core::{Money, Payment};

/// Summed payment columns for one customer (optionally one sub-account).
#[derive(Debug, Clone, Copy, FromRow)]
pub struct PaymentTotals {
    pub total_paid_kurus: i64,
    pub total_refunded_kurus: i64,
}

impl PaymentTotals {
    /// Net money the customer has actually paid in.
    pub fn net_paid(&self) -> Money {
        Money::from_kurus(self.total_paid_kurus - self.total_refunded_kurus)
    }
}

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Gets a payment by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, customer_id, sub_customer_id, debt_id, amount_kurus,
                   refund_amount_kurus, payment_type, description, notes,
                   status, created_at
            FROM payments
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Lists a customer's payments, newest first. Cancelled rows included.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, customer_id, sub_customer_id, debt_id, amount_kurus,
                   refund_amount_kurus, payment_type, description, notes,
                   status, created_at
            FROM payments
            WHERE customer_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Sums paid and refunded amounts over a customer's active payments.
    ///
    /// When `sub_customer_id` is given, only that sub-account's rows count;
    /// refund reconciliation for a sub-account debt scopes this way.
    pub async fn totals(
        &self,
        customer_id: &str,
        sub_customer_id: Option<&str>,
    ) -> DbResult<PaymentTotals> {
        let totals = match sub_customer_id {
            Some(sub_id) => {
                sqlx::query_as::<_, PaymentTotals>(
                    r#"
                    SELECT
                        COALESCE(SUM(amount_kurus), 0) AS total_paid_kurus,
                        COALESCE(SUM(refund_amount_kurus), 0) AS total_refunded_kurus
                    FROM payments
                    WHERE customer_id = ?1 AND sub_customer_id = ?2 AND status = 'active'
                    "#,
                )
                .bind(customer_id)
                .bind(sub_id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, PaymentTotals>(
                    r#"
                    SELECT
                        COALESCE(SUM(amount_kurus), 0) AS total_paid_kurus,
                        COALESCE(SUM(refund_amount_kurus), 0) AS total_refunded_kurus
                    FROM payments
                    WHERE customer_id = ?1 AND status = 'active'
                    "#,
                )
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(totals)
    }

    /// Cancels a payment (soft delete; the row stays visible).
    ///
    /// Cancelled rows drop out of `totals()` but any debt allocation the
    /// payment performed is NOT reversed here; corrections go through a
    /// manual debt edit.
    pub async fn cancel(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Cancelling payment");

        let result = sqlx::query("UPDATE payments SET status = 'cancelled' WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Payment", id));
        }

        Ok(())
    }
}
