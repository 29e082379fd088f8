//! # Debt Repository
//!
//! Debt rows: sale-generated, manual entries, and corrections.
//!
//! Payment allocation mutates debts through `LedgerService::record_payment`
//! inside a transaction; this repository covers direct reads, manual debt
//! entry, and the hand-edit path (amount / due date / settle flag).

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukkan_core::Debt;

/// Hand-edit of an existing debt. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct DebtPatch {
    pub amount_kurus: Option<i64>,
    pub is_paid: Option<bool>,
    pub due_date: Option<Option<NaiveDate>>,
    pub description: Option<Option<String>>,
}

/// Repository for debt database operations.
#[derive(Debug, Clone)]
pub struct DebtRepository {
    pool: SqlitePool,
}

impl DebtRepository {
    /// Creates a new DebtRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DebtRepository { pool }
    }

    /// Gets a debt by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Debt>> {
        let debt = sqlx::query_as::<_, Debt>(
            r#"
            SELECT id, customer_id, sub_customer_id, amount_kurus, paid_amount_kurus,
                   is_paid, sale_id, kind, description, due_date, status, created_at
            FROM debts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(debt)
    }

    /// Lists a customer's debts, newest first. Includes settled ones.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<Debt>> {
        let debts = sqlx::query_as::<_, Debt>(
            r#"
            SELECT id, customer_id, sub_customer_id, amount_kurus, paid_amount_kurus,
                   is_paid, sale_id, kind, description, due_date, status, created_at
            FROM debts
            WHERE customer_id = ?1 AND status = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(debts)
    }

    /// Open (unsettled) debts for a customer, oldest first.
    ///
    /// This ordering IS the allocation order: payments without a target
    /// debt pay these down front to back.
    pub async fn open_debts_oldest_first(&self, customer_id: &str) -> DbResult<Vec<Debt>> {
        let debts = sqlx::query_as::<_, Debt>(
            r#"
            SELECT id, customer_id, sub_customer_id, amount_kurus, paid_amount_kurus,
                   is_paid, sale_id, kind, description, due_date, status, created_at
            FROM debts
            WHERE customer_id = ?1 AND is_paid = 0 AND status = 'active'
            ORDER BY created_at ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(debts)
    }

    /// Inserts a manual debt (opening balance, hand-written entry).
    ///
    /// Sale debts are inserted by `LedgerService::create_sale` inside the
    /// sale's transaction, not here.
    pub async fn insert(&self, debt: &Debt) -> DbResult<Debt> {
        debug!(customer_id = %debt.customer_id, amount = debt.amount_kurus, "Inserting debt");

        sqlx::query(
            r#"
            INSERT INTO debts (
                id, customer_id, sub_customer_id, amount_kurus, paid_amount_kurus,
                is_paid, sale_id, kind, description, due_date, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&debt.id)
        .bind(&debt.customer_id)
        .bind(&debt.sub_customer_id)
        .bind(debt.amount_kurus)
        .bind(debt.paid_amount_kurus)
        .bind(debt.is_paid)
        .bind(&debt.sale_id)
        .bind(debt.kind)
        .bind(&debt.description)
        .bind(debt.due_date)
        .bind(debt.status)
        .bind(debt.created_at)
        .execute(&self.pool)
        .await?;

        Ok(debt.clone())
    }

    /// Applies a hand-edit to a debt and returns the updated row.
    ///
    /// `is_paid` is recomputed when only the amount changes, so lowering a
    /// debt below its paid-down total settles it.
    pub async fn patch(&self, id: &str, patch: DebtPatch) -> DbResult<Debt> {
        let mut debt = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Debt", id))?;

        if let Some(amount) = patch.amount_kurus {
            debt.amount_kurus = amount;
            debt.is_paid = debt.paid_amount_kurus >= debt.amount_kurus;
        }
        if let Some(is_paid) = patch.is_paid {
            debt.is_paid = is_paid;
        }
        if let Some(due_date) = patch.due_date {
            debt.due_date = due_date;
        }
        if let Some(description) = patch.description {
            debt.description = description;
        }

        sqlx::query(
            r#"
            UPDATE debts SET
                amount_kurus = ?2,
                is_paid = ?3,
                due_date = ?4,
                description = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(debt.amount_kurus)
        .bind(debt.is_paid)
        .bind(debt.due_date)
        .bind(&debt.description)
        .execute(&self.pool)
        .await?;

        debug!(id = %id, "Debt patched");

        Ok(debt)
    }

    /// Soft-deletes a debt.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting debt");

        let result = sqlx::query("UPDATE debts SET status = 'deleted' WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Debt", id));
        }

        Ok(())
    }
}
