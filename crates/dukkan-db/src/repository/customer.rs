//! # Customer Repository
//!
//! Customers and their sub-customer accounts.
//!
//! ## Two-Level Identity
//! ```text
//! Customer "Ahmet Usta"  ← root identity, owns the debts
//!   ├── SubCustomer "Şantiye A"   status: active
//!   └── SubCustomer "Şantiye B"   status: inactive (closed; terminal)
//! ```
//!
//! The open/closed rule lives in `dukkan_core::ledger::account`; this
//! repository applies it at the update boundary so a closed account can
//! never be reopened through any write path.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukkan_core::ledger::check_status_transition;
use dukkan_core::{AccountStatus, Customer, SubCustomer};

/// Repository for customer and sub-customer operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, address, is_active, created_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists active customers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, address, is_active, created_at
            FROM customers
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Inserts a new customer.
    pub async fn insert(&self, customer: &Customer) -> DbResult<Customer> {
        debug!(name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, address, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.is_active)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(customer.clone())
    }

    /// Updates a customer's contact fields.
    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE customers SET name = ?2, phone = ?3, address = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &customer.id));
        }

        Ok(())
    }

    /// Soft-deletes a customer. The ledger rows stay.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting customer");

        let result = sqlx::query("UPDATE customers SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    // =========================================================================
    // Sub-Customers
    // =========================================================================

    /// Gets a sub-customer by ID.
    pub async fn get_sub_customer(&self, id: &str) -> DbResult<Option<SubCustomer>> {
        let sub = sqlx::query_as::<_, SubCustomer>(
            r#"
            SELECT id, customer_id, name, status, created_at, updated_at
            FROM sub_customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sub)
    }

    /// Lists a customer's sub-customers, newest first.
    pub async fn list_sub_customers(&self, customer_id: &str) -> DbResult<Vec<SubCustomer>> {
        let subs = sqlx::query_as::<_, SubCustomer>(
            r#"
            SELECT id, customer_id, name, status, created_at, updated_at
            FROM sub_customers
            WHERE customer_id = ?1 AND status != 'deleted'
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subs)
    }

    /// Inserts a new sub-customer account.
    pub async fn insert_sub_customer(&self, sub: &SubCustomer) -> DbResult<SubCustomer> {
        debug!(customer_id = %sub.customer_id, name = %sub.name, "Inserting sub-customer");

        sqlx::query(
            r#"
            INSERT INTO sub_customers (id, customer_id, name, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&sub.id)
        .bind(&sub.customer_id)
        .bind(&sub.name)
        .bind(sub.status)
        .bind(sub.created_at)
        .bind(sub.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(sub.clone())
    }

    /// Applies a rename and/or status change to a sub-customer.
    ///
    /// The one-way door: once an account is closed (`inactive`) or deleted
    /// it cannot go back to `active`. The guard runs before anything is
    /// written and both fields land in one UPDATE, so a rejected reopen
    /// leaves the row untouched, name included. Rejected transitions return
    /// [`dukkan_core::CoreError::AccountClosed`] through the `Core` variant.
    pub async fn update_sub_customer(
        &self,
        id: &str,
        name: Option<&str>,
        status: Option<AccountStatus>,
    ) -> DbResult<SubCustomer> {
        let mut sub = self
            .get_sub_customer(id)
            .await?
            .ok_or_else(|| DbError::not_found("SubCustomer", id))?;

        if let Some(requested) = status {
            check_status_transition(id, sub.status, requested)?;
            sub.status = requested;
        }
        if let Some(name) = name {
            sub.name = name.to_string();
        }
        sub.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE sub_customers SET name = ?2, status = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&sub.name)
        .bind(sub.status)
        .bind(sub.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %id, status = ?sub.status, "Sub-customer updated");

        Ok(sub)
    }
}
