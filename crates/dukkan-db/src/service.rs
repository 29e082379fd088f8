//! # Ledger Service
//!
//! The three multi-entity flows, each wrapped in ONE SQLite transaction.
//!
//! ## Why a Service on Top of Repositories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Transaction Boundaries                                │
//! │                                                                         │
//! │  create_sale:     stock check+decrement → sale → items → debt?         │
//! │  record_payment:  payment row → targeted apply | oldest-first walk     │
//! │  record_refund:   refund row → offset payment → stock restore         │
//! │                                                                         │
//! │  Any step failing rolls the WHOLE flow back. Stock can never end up    │
//! │  decremented without the matching sale row, and a refund can never     │
//! │  restore stock without its ledger offset.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger math itself (allocation order, refund headroom, debt
//! settlement) lives in `dukkan_core::ledger`; this service feeds it rows
//! read inside the transaction and writes back what it decides.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use dukkan_core::ledger::{
    allocate_oldest_first, apply_to_debt, debt_from_sale, plan_refund, Allocation, RefundContext,
    REFUND_OFFSET_DESCRIPTION,
};
use dukkan_core::validation::{validate_amount_kurus, validate_quantity};
use dukkan_core::{
    CoreError, Debt, Payment, PaymentStatus, PaymentType, Product, RecordStatus, Refund,
    RefundStatus, Sale, SaleItem, ValidationError, MAX_SALE_ITEMS,
};

// =============================================================================
// Inputs & Outcomes
// =============================================================================

/// One requested line of a new sale, identified by barcode.
#[derive(Debug, Clone)]
pub struct NewSaleItem {
    pub barcode: String,
    pub quantity: i64,
}

/// A new sale request.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub customer_id: Option<String>,
    pub sub_customer_id: Option<String>,
    pub items: Vec<NewSaleItem>,
    pub payment_type: PaymentType,
    /// Credit sale: opens a debt for `customer_id` instead of settling.
    pub is_debt: bool,
}

/// Everything a committed sale wrote.
#[derive(Debug, Clone)]
pub struct SaleOutcome {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
    /// Present when `is_debt` was set.
    pub debt: Option<Debt>,
}

/// A new payment request.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub customer_id: String,
    pub sub_customer_id: Option<String>,
    /// Target one debt, or `None` for oldest-first allocation.
    pub debt_id: Option<String>,
    pub amount_kurus: i64,
    pub payment_type: PaymentType,
    pub description: Option<String>,
}

/// Everything a committed payment wrote.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub payment: Payment,
    pub allocations: Vec<Allocation>,
    /// Remainder that found no open debt. The full amount stays on the
    /// payment row regardless; callers surface this to the operator.
    pub unallocated_kurus: i64,
}

/// A new refund request against one debt.
#[derive(Debug, Clone)]
pub struct NewRefund {
    pub debt_id: String,
    pub barcode: String,
    pub quantity: i64,
    pub refund_kurus: i64,
}

/// Everything a committed refund wrote.
#[derive(Debug, Clone)]
pub struct RefundOutcome {
    pub refund: Refund,
    /// The "Geri Ödeme" offset row.
    pub offset_payment: Payment,
    /// Whether the account counted as settled at refund time.
    pub closed_account: bool,
}

// =============================================================================
// Service
// =============================================================================

/// Transactional ledger flows. Obtained via `Database::ledger()`.
#[derive(Debug, Clone)]
pub struct LedgerService {
    pool: SqlitePool,
}

impl LedgerService {
    /// Creates a new LedgerService.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerService { pool }
    }

    // =========================================================================
    // Sale
    // =========================================================================

    /// Creates a sale: stock decrement, sale + item rows, optional debt.
    ///
    /// ## Errors
    /// * `CoreError::ProductNotFound` - unknown barcode
    /// * `CoreError::InsufficientStock` - quantity exceeds stock; nothing
    ///   is written, earlier items in the same request roll back too
    /// * `CoreError::DebtWithoutCustomer` - `is_debt` without a customer
    pub async fn create_sale(&self, req: NewSale) -> DbResult<SaleOutcome> {
        if req.items.is_empty() {
            return Err(CoreError::from(ValidationError::Required {
                field: "items".to_string(),
            })
            .into());
        }
        if req.items.len() > MAX_SALE_ITEMS {
            return Err(CoreError::from(ValidationError::OutOfRange {
                field: "items".to_string(),
                min: 1,
                max: MAX_SALE_ITEMS as i64,
            })
            .into());
        }
        for item in &req.items {
            validate_quantity(item.quantity).map_err(CoreError::from)?;
        }
        if req.is_debt && req.customer_id.is_none() {
            return Err(CoreError::DebtWithoutCustomer.into());
        }

        let now = Utc::now();
        let sale_id = generate_id();

        let mut tx = self.pool.begin().await?;

        let mut items = Vec::with_capacity(req.items.len());
        let mut total_kurus: i64 = 0;

        for line in &req.items {
            let product = fetch_product_by_barcode(&mut tx, &line.barcode)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(line.barcode.clone()))?;

            // Guarded decrement: the WHERE clause makes the stock check and
            // the write one atomic statement, so two concurrent sales cannot
            // both pass a read-then-write check.
            let updated = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - ?2, updated_at = ?3
                WHERE id = ?1 AND stock >= ?2
                "#,
            )
            .bind(&product.id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(CoreError::InsufficientStock {
                    barcode: line.barcode.clone(),
                    available: product.stock,
                    requested: line.quantity,
                }
                .into());
            }

            let line_total = product.price_kurus * line.quantity;
            total_kurus += line_total;

            items.push(SaleItem {
                id: generate_id(),
                sale_id: sale_id.clone(),
                product_id: product.id.clone(),
                barcode: product.barcode.clone(),
                name_snapshot: product.name.clone(),
                unit_price_kurus: product.price_kurus,
                quantity: line.quantity,
                line_total_kurus: line_total,
            });
        }

        let sale = Sale {
            id: sale_id.clone(),
            customer_id: req.customer_id.clone(),
            sub_customer_id: req.sub_customer_id.clone(),
            total_kurus,
            payment_type: req.payment_type,
            is_debt: req.is_debt,
            status: RecordStatus::Active,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, customer_id, sub_customer_id, total_kurus, payment_type,
                is_debt, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.customer_id)
        .bind(&sale.sub_customer_id)
        .bind(sale.total_kurus)
        .bind(sale.payment_type)
        .bind(sale.is_debt)
        .bind(sale.status)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, product_id, barcode, name_snapshot,
                    unit_price_kurus, quantity, line_total_kurus
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.product_id)
            .bind(&item.barcode)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_kurus)
            .bind(item.quantity)
            .bind(item.line_total_kurus)
            .execute(&mut *tx)
            .await?;
        }

        let debt = if req.is_debt {
            let debt = debt_from_sale(generate_id(), &sale, &items, now);
            insert_debt(&mut tx, &debt).await?;
            Some(debt)
        } else {
            None
        };

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            total_kurus = sale.total_kurus,
            is_debt = sale.is_debt,
            "Sale committed"
        );

        Ok(SaleOutcome { sale, items, debt })
    }

    // =========================================================================
    // Payment
    // =========================================================================

    /// Records a payment and pays debts down.
    ///
    /// Targeted (`debt_id` set): the full amount goes to that debt, even
    /// past its total. Untargeted: the amount walks the customer's open
    /// debts oldest-first; any remainder stays on the payment row and is
    /// returned as `unallocated_kurus`.
    pub async fn record_payment(&self, req: NewPayment) -> DbResult<PaymentOutcome> {
        validate_amount_kurus(req.amount_kurus).map_err(CoreError::from)?;

        let now = Utc::now();
        let amount = dukkan_core::Money::from_kurus(req.amount_kurus);

        let mut tx = self.pool.begin().await?;

        let customer_exists: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = ?1")
                .bind(&req.customer_id)
                .fetch_one(&mut *tx)
                .await?;
        if customer_exists == 0 {
            return Err(CoreError::CustomerNotFound(req.customer_id.clone()).into());
        }

        let (allocations, unallocated_kurus) = match &req.debt_id {
            Some(debt_id) => {
                let mut debt = fetch_debt(&mut tx, debt_id)
                    .await?
                    .ok_or_else(|| CoreError::DebtNotFound(debt_id.clone()))?;

                apply_to_debt(&mut debt, amount);
                write_debt_paydown(&mut tx, &debt).await?;

                let alloc = Allocation {
                    debt_id: debt.id.clone(),
                    applied: amount,
                    new_paid_kurus: debt.paid_amount_kurus,
                    is_paid: debt.is_paid,
                };
                (vec![alloc], 0)
            }
            None => {
                let open = fetch_open_debts_oldest_first(&mut tx, &req.customer_id).await?;
                let outcome = allocate_oldest_first(&open, amount);

                for alloc in &outcome.allocations {
                    sqlx::query(
                        r#"
                        UPDATE debts SET paid_amount_kurus = ?2, is_paid = ?3
                        WHERE id = ?1
                        "#,
                    )
                    .bind(&alloc.debt_id)
                    .bind(alloc.new_paid_kurus)
                    .bind(alloc.is_paid)
                    .execute(&mut *tx)
                    .await?;
                }

                if outcome.unallocated.is_positive() {
                    warn!(
                        customer_id = %req.customer_id,
                        unallocated_kurus = outcome.unallocated.kurus(),
                        "Payment exceeds open debts; remainder stays on the payment row"
                    );
                }

                (outcome.allocations, outcome.unallocated.kurus())
            }
        };

        let payment = Payment {
            id: generate_id(),
            customer_id: req.customer_id.clone(),
            sub_customer_id: req.sub_customer_id.clone(),
            debt_id: req.debt_id.clone(),
            amount_kurus: req.amount_kurus,
            refund_amount_kurus: 0,
            payment_type: req.payment_type,
            description: req.description.clone(),
            notes: None,
            status: PaymentStatus::Active,
            created_at: now,
        };
        insert_payment(&mut tx, &payment).await?;

        tx.commit().await?;

        debug!(
            payment_id = %payment.id,
            amount_kurus = payment.amount_kurus,
            debts_touched = allocations.len(),
            "Payment committed"
        );

        Ok(PaymentOutcome {
            payment,
            allocations,
            unallocated_kurus,
        })
    }

    // =========================================================================
    // Refund
    // =========================================================================

    /// Records a refund: refund row, "Geri Ödeme" offset payment, stock
    /// restore. All three or none.
    ///
    /// ## Errors
    /// * `CoreError::DebtNotFound` - unknown debt
    /// * `CoreError::ProductNotFound` - unknown barcode
    /// * `CoreError::RefundExceedsDebt` - prior + requested over the debt
    pub async fn record_refund(&self, req: NewRefund) -> DbResult<RefundOutcome> {
        validate_quantity(req.quantity).map_err(CoreError::from)?;
        validate_amount_kurus(req.refund_kurus).map_err(CoreError::from)?;

        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let debt = fetch_debt(&mut tx, &req.debt_id)
            .await?
            .ok_or_else(|| CoreError::DebtNotFound(req.debt_id.clone()))?;

        let product = fetch_product_by_barcode(&mut tx, &req.barcode)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(req.barcode.clone()))?;

        let prior_refunds: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(refund_kurus), 0)
            FROM refunds
            WHERE debt_id = ?1 AND status = 'completed'
            "#,
        )
        .bind(&req.debt_id)
        .fetch_one(&mut *tx)
        .await?;

        let (total_paid, total_refunded) =
            fetch_payment_totals(&mut tx, &debt.customer_id, debt.sub_customer_id.as_deref())
                .await?;

        let ctx = RefundContext {
            debt_amount: debt.amount(),
            prior_refunds: dukkan_core::Money::from_kurus(prior_refunds),
            total_paid: dukkan_core::Money::from_kurus(total_paid),
            total_refunded: dukkan_core::Money::from_kurus(total_refunded),
        };
        let plan = plan_refund(&req.debt_id, &ctx, dukkan_core::Money::from_kurus(req.refund_kurus))
            .map_err(DbError::from)?;

        let refund = Refund {
            id: generate_id(),
            debt_id: req.debt_id.clone(),
            customer_id: debt.customer_id.clone(),
            sub_customer_id: debt.sub_customer_id.clone(),
            product_id: product.id.clone(),
            barcode: product.barcode.clone(),
            quantity: req.quantity,
            refund_kurus: req.refund_kurus,
            status: RefundStatus::Completed,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO refunds (
                id, debt_id, customer_id, sub_customer_id, product_id,
                barcode, quantity, refund_kurus, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&refund.id)
        .bind(&refund.debt_id)
        .bind(&refund.customer_id)
        .bind(&refund.sub_customer_id)
        .bind(&refund.product_id)
        .bind(&refund.barcode)
        .bind(refund.quantity)
        .bind(refund.refund_kurus)
        .bind(refund.status)
        .bind(refund.created_at)
        .execute(&mut *tx)
        .await?;

        let offset_payment = Payment {
            id: generate_id(),
            customer_id: debt.customer_id.clone(),
            sub_customer_id: debt.sub_customer_id.clone(),
            debt_id: Some(debt.id.clone()),
            amount_kurus: 0,
            refund_amount_kurus: req.refund_kurus,
            payment_type: PaymentType::Cash,
            description: Some(REFUND_OFFSET_DESCRIPTION.to_string()),
            notes: Some(plan.offset_note.to_string()),
            status: PaymentStatus::Active,
            created_at: now,
        };
        insert_payment(&mut tx, &offset_payment).await?;

        // Returned goods go back on the shelf.
        sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(req.quantity)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            refund_id = %refund.id,
            debt_id = %refund.debt_id,
            refund_kurus = refund.refund_kurus,
            closed_account = plan.closed_account,
            "Refund committed"
        );

        Ok(RefundOutcome {
            refund,
            offset_payment,
            closed_account: plan.closed_account,
        })
    }
}

// =============================================================================
// Transaction-Scoped Helpers
// =============================================================================

async fn fetch_product_by_barcode(
    tx: &mut Transaction<'_, Sqlite>,
    barcode: &str,
) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, barcode, name, price_kurus, purchase_price_kurus, stock,
               category, brand, supplier, is_active, created_at, updated_at
        FROM products
        WHERE barcode = ?1 AND is_active = 1
        "#,
    )
    .bind(barcode)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(product)
}

async fn fetch_debt(tx: &mut Transaction<'_, Sqlite>, id: &str) -> DbResult<Option<Debt>> {
    let debt = sqlx::query_as::<_, Debt>(
        r#"
        SELECT id, customer_id, sub_customer_id, amount_kurus, paid_amount_kurus,
               is_paid, sale_id, kind, description, due_date, status, created_at
        FROM debts
        WHERE id = ?1 AND status = 'active'
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(debt)
}

async fn fetch_open_debts_oldest_first(
    tx: &mut Transaction<'_, Sqlite>,
    customer_id: &str,
) -> DbResult<Vec<Debt>> {
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
    .fetch_all(&mut **tx)
    .await?;

    Ok(debts)
}

async fn fetch_payment_totals(
    tx: &mut Transaction<'_, Sqlite>,
    customer_id: &str,
    sub_customer_id: Option<&str>,
) -> DbResult<(i64, i64)> {
    let row: (i64, i64) = match sub_customer_id {
        Some(sub_id) => {
            sqlx::query_as(
                r#"
                SELECT
                    COALESCE(SUM(amount_kurus), 0),
                    COALESCE(SUM(refund_amount_kurus), 0)
                FROM payments
                WHERE customer_id = ?1 AND sub_customer_id = ?2 AND status = 'active'
                "#,
            )
            .bind(customer_id)
            .bind(sub_id)
            .fetch_one(&mut **tx)
            .await?
        }
        None => {
            sqlx::query_as(
                r#"
                SELECT
                    COALESCE(SUM(amount_kurus), 0),
                    COALESCE(SUM(refund_amount_kurus), 0)
                FROM payments
                WHERE customer_id = ?1 AND status = 'active'
                "#,
            )
            .bind(customer_id)
            .fetch_one(&mut **tx)
            .await?
        }
    };

    Ok(row)
}

async fn insert_debt(tx: &mut Transaction<'_, Sqlite>, debt: &Debt) -> DbResult<()> {
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
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn write_debt_paydown(tx: &mut Transaction<'_, Sqlite>, debt: &Debt) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE debts SET paid_amount_kurus = ?2, is_paid = ?3
        WHERE id = ?1
        "#,
    )
    .bind(&debt.id)
    .bind(debt.paid_amount_kurus)
    .bind(debt.is_paid)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_payment(tx: &mut Transaction<'_, Sqlite>, payment: &Payment) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO payments (
            id, customer_id, sub_customer_id, debt_id, amount_kurus,
            refund_amount_kurus, payment_type, description, notes,
            status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&payment.id)
    .bind(&payment.customer_id)
    .bind(&payment.sub_customer_id)
    .bind(&payment.debt_id)
    .bind(payment.amount_kurus)
    .bind(payment.refund_amount_kurus)
    .bind(payment.payment_type)
    .bind(&payment.description)
    .bind(&payment.notes)
    .bind(payment.status)
    .bind(payment.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
