//! # Register Repository
//!
//! The daily kasa summary: what one calendar day did to the drawer.
//!
//! ## Aggregates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /api/register/daily?date=2026-08-24                               │
//! │                                                                         │
//! │  sales      → count + total, split cash-settled vs on-credit           │
//! │  payments   → count + total collected (amount_kurus)                   │
//! │  refunds    → count + total handed back (refund_kurus)                 │
//! │                                                                         │
//! │  net_kurus = cash sales + payments collected − refunds                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Credit sales don't put money in the drawer on the day of the sale; the
//! matching payments do, on whatever day they arrive. That's why the split
//! matters.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// One day's register summary.
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,

    pub sales_count: i64,
    /// All sales booked that day, cash and credit together.
    pub sales_total_kurus: i64,
    /// Sales settled on the spot (is_debt = 0).
    pub cash_sales_kurus: i64,
    /// Credit sales that opened a debt instead of taking money.
    pub credit_sales_kurus: i64,

    pub payments_count: i64,
    /// Money collected against debts that day.
    pub payments_total_kurus: i64,

    pub refunds_count: i64,
    /// Money handed back that day.
    pub refunds_total_kurus: i64,

    /// Drawer movement: cash sales + collected payments − refunds.
    pub net_kurus: i64,
}

#[derive(Debug, FromRow)]
struct SalesRow {
    sales_count: i64,
    sales_total_kurus: i64,
    cash_sales_kurus: i64,
    credit_sales_kurus: i64,
}

#[derive(Debug, FromRow)]
struct SumRow {
    row_count: i64,
    total_kurus: i64,
}

/// Repository computing the daily register summary.
#[derive(Debug, Clone)]
pub struct RegisterRepository {
    pool: SqlitePool,
}

impl RegisterRepository {
    /// Creates a new RegisterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RegisterRepository { pool }
    }

    /// Builds the summary for one calendar day.
    ///
    /// Timestamps are stored as UTC text; `date()` extracts the day part,
    /// so "a day" here means a UTC day.
    pub async fn daily_summary(&self, date: NaiveDate) -> DbResult<DailySummary> {
        let day = date.format("%Y-%m-%d").to_string();

        debug!(date = %day, "Computing daily register summary");

        let sales = sqlx::query_as::<_, SalesRow>(
            r#"
            SELECT
                COUNT(*) AS sales_count,
                COALESCE(SUM(total_kurus), 0) AS sales_total_kurus,
                COALESCE(SUM(CASE WHEN is_debt = 0 THEN total_kurus ELSE 0 END), 0)
                    AS cash_sales_kurus,
                COALESCE(SUM(CASE WHEN is_debt = 1 THEN total_kurus ELSE 0 END), 0)
                    AS credit_sales_kurus
            FROM sales
            WHERE status = 'active' AND date(created_at) = ?1
            "#,
        )
        .bind(&day)
        .fetch_one(&self.pool)
        .await?;

        // Refund offsets carry amount_kurus = 0, so they don't inflate the
        // collected total; only their row count would, hence the filter.
        let payments = sqlx::query_as::<_, SumRow>(
            r#"
            SELECT
                COUNT(*) AS row_count,
                COALESCE(SUM(amount_kurus), 0) AS total_kurus
            FROM payments
            WHERE status = 'active' AND amount_kurus > 0 AND date(created_at) = ?1
            "#,
        )
        .bind(&day)
        .fetch_one(&self.pool)
        .await?;

        let refunds = sqlx::query_as::<_, SumRow>(
            r#"
            SELECT
                COUNT(*) AS row_count,
                COALESCE(SUM(refund_kurus), 0) AS total_kurus
            FROM refunds
            WHERE status = 'completed' AND date(created_at) = ?1
            "#,
        )
        .bind(&day)
        .fetch_one(&self.pool)
        .await?;

        Ok(DailySummary {
            date,
            sales_count: sales.sales_count,
            sales_total_kurus: sales.sales_total_kurus,
            cash_sales_kurus: sales.cash_sales_kurus,
            credit_sales_kurus: sales.credit_sales_kurus,
            payments_count: payments.row_count,
            payments_total_kurus: payments.total_kurus,
            refunds_count: refunds.row_count,
            refunds_total_kurus: refunds.total_kurus,
            net_kurus: sales.cash_sales_kurus + payments.total_kurus - refunds.total_kurus,
        })
    }
}
