//! # Product Repository
//!
//! Database operations for barcode-identified products.
//!
//! ## Barcode Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    POS Scan Flow                                        │
//! │                                                                         │
//! │  Scanner reads: "8690000000001"                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find_by_barcode() ← UNIQUE index on barcode, O(log n)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Product { name: "Süt 1L", price_kurus: 1500, stock: 12, .. }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock mutations during a sale do NOT go through this repository; the
//! guarded decrement lives in `LedgerService::create_sale` so it shares the
//! sale's transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukkan_core::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Finds a product by barcode (the scan path).
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No product carries this barcode
    pub async fn find_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, barcode, name, price_kurus, purchase_price_kurus, stock,
                   category, brand, supplier, is_active, created_at, updated_at
            FROM products
            WHERE barcode = ?1
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, barcode, name, price_kurus, purchase_price_kurus, stock,
                   category, brand, supplier, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists active products ordered by name.
    ///
    /// An optional case-insensitive name/barcode filter narrows the result;
    /// an empty filter returns everything active up to `limit`.
    pub async fn list(&self, filter: Option<&str>, limit: u32) -> DbResult<Vec<Product>> {
        let filter = filter.map(str::trim).unwrap_or("");

        debug!(filter = %filter, limit = %limit, "Listing products");

        let products = if filter.is_empty() {
            sqlx::query_as::<_, Product>(
                r#"
                SELECT id, barcode, name, price_kurus, purchase_price_kurus, stock,
                       category, brand, supplier, is_active, created_at, updated_at
                FROM products
                WHERE is_active = 1
                ORDER BY name
                LIMIT ?1
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        } else {
            let pattern = format!("%{}%", filter);
            sqlx::query_as::<_, Product>(
                r#"
                SELECT id, barcode, name, price_kurus, purchase_price_kurus, stock,
                       category, brand, supplier, is_active, created_at, updated_at
                FROM products
                WHERE is_active = 1
                  AND (name LIKE ?1 OR barcode LIKE ?1)
                ORDER BY name
                LIMIT ?2
                "#,
            )
            .bind(pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product
    /// * `Err(DbError::UniqueViolation)` - Barcode already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(barcode = %product.barcode, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, barcode, name, price_kurus, purchase_price_kurus, stock,
                category, brand, supplier, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(product.price_kurus)
        .bind(product.purchase_price_kurus)
        .bind(product.stock)
        .bind(&product.category)
        .bind(&product.brand)
        .bind(&product.supplier)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates an existing product.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                barcode = ?2,
                name = ?3,
                price_kurus = ?4,
                purchase_price_kurus = ?5,
                stock = ?6,
                category = ?7,
                brand = ?8,
                supplier = ?9,
                is_active = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(product.price_kurus)
        .bind(product.purchase_price_kurus)
        .bind(product.stock)
        .bind(&product.category)
        .bind(&product.brand)
        .bind(&product.supplier)
        .bind(product.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Adjusts product stock by a delta (restocking, corrections).
    ///
    /// Negative deltas that would take stock below zero trip the schema
    /// `CHECK (stock >= 0)` and surface as a query error; sale-path
    /// decrements use the guarded UPDATE in `LedgerService` instead so
    /// they report [`dukkan_core::CoreError::InsufficientStock`].
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Historical sale items keep their snapshot of the product, so the row
    /// itself is never removed.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET is_active = 0, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
