//! # Domain Types
//!
//! Core domain types used throughout Dukkan.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │      Debt       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  barcode        │──►│  items[]        │──►│  amount_kurus   │       │
//! │  │  stock          │   │  is_debt        │   │  paid_amount    │       │
//! │  │  price_kurus    │   │  total_kurus    │   │  is_paid        │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │                │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │   Customer      │   │   SubCustomer   │   │ Payment/Refund  │       │
//! │  │  root identity  │──►│  account status │   │ ledger entries  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! Every entity is soft-deleted via a status field; nothing is ever removed
//! from the ledger. A cancelled payment stays visible with
//! `status = cancelled`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Status Enums
// =============================================================================

/// Generic soft-delete status for sales and debts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Active,
    Deleted,
}

impl Default for RecordStatus {
    fn default() -> Self {
        RecordStatus::Active
    }
}

/// Account state of a sub-customer ledger.
///
/// ## State Machine
/// ```text
/// Active ──► Inactive (closed; terminal, cannot be reopened)
/// Deleted is a soft-delete flag, not part of the open/closed machine.
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
    Deleted,
}

/// Payment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Active,
    Cancelled,
}

/// Refund lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    Completed,
    Cancelled,
}

/// How a debt came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    /// Created automatically by a credit sale.
    Sale,
    /// Entered by hand (e.g., opening balance).
    Manual,
    /// Ledger correction.
    Adjustment,
}

/// How a sale or payment was tendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Cash,
    Card,
    Transfer,
}

// =============================================================================
// Product
// =============================================================================

/// A barcode-identified product with tracked stock.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Barcode (EAN-13 etc.) - unique business identifier.
    pub barcode: String,

    /// Display name shown on receipts and debt descriptions.
    pub name: String,

    /// Sale price in kuruş.
    pub price_kurus: i64,

    /// Purchase price in kuruş (for margin reporting).
    pub purchase_price_kurus: i64,

    /// Current stock level. Invariant: never negative.
    pub stock: i64,

    pub category: Option<String>,
    pub brand: Option<String>,
    pub supplier: Option<String>,

    /// Soft-delete flag.
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_kurus(self.price_kurus)
    }

    /// Checks if the requested quantity can be sold from stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Customer & SubCustomer
// =============================================================================

/// Root identity for a ledger.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A sub-account under a customer, carrying the open/closed state.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SubCustomer {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    pub status: AccountStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub customer_id: Option<String>,
    pub sub_customer_id: Option<String>,
    pub total_kurus: i64,
    pub payment_type: PaymentType,
    /// Credit sale: opens a Debt for the customer instead of settling in cash.
    pub is_debt: bool,
    pub status: RecordStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_kurus(self.total_kurus)
    }
}

/// A line item in a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Barcode at time of sale (frozen).
    pub barcode: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Unit price in kuruş at time of sale (frozen).
    pub unit_price_kurus: i64,
    pub quantity: i64,
    /// unit_price × quantity.
    pub line_total_kurus: i64,
}

// =============================================================================
// Debt
// =============================================================================

/// An amount owed by a customer, optionally linked to a sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Debt {
    pub id: String,
    pub customer_id: String,
    pub sub_customer_id: Option<String>,
    /// Total owed in kuruş.
    pub amount_kurus: i64,
    /// Paid-down portion in kuruş.
    pub paid_amount_kurus: i64,
    /// Derived: `paid_amount_kurus >= amount_kurus`.
    pub is_paid: bool,
    pub sale_id: Option<String>,
    pub kind: DebtKind,
    /// E.g. "2 adet Süt, 1 adet Ekmek" for sale debts.
    pub description: Option<String>,
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,
    pub status: RecordStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Debt {
    /// Returns the total owed as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_kurus(self.amount_kurus)
    }

    /// Returns the paid-down portion as Money.
    #[inline]
    pub fn paid_amount(&self) -> Money {
        Money::from_kurus(self.paid_amount_kurus)
    }

    /// Outstanding balance: `amount - paid_amount`, floored at zero.
    #[inline]
    pub fn remaining(&self) -> Money {
        self.amount().sub_floor_zero(self.paid_amount())
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Money received from (or, for refunds, returned to) a customer.
///
/// ## Two Shapes
/// - Regular payment: `amount_kurus > 0`, `refund_amount_kurus = 0`
/// - Refund offset: `amount_kurus = 0`, `refund_amount_kurus > 0`,
///   description "Geri Ödeme" - the accounting fiction for money handed
///   back to the customer
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Payment {
    pub id: String,
    pub customer_id: String,
    pub sub_customer_id: Option<String>,
    /// When set, the payment targets one debt; otherwise it is allocated
    /// across the customer's open debts oldest-first.
    pub debt_id: Option<String>,
    pub amount_kurus: i64,
    pub refund_amount_kurus: i64,
    pub payment_type: PaymentType,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub status: PaymentStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_kurus(self.amount_kurus)
    }
}

// =============================================================================
// Refund
// =============================================================================

/// A reversal of part of a sale: stock restored, ledger offset.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Refund {
    pub id: String,
    pub debt_id: String,
    pub customer_id: String,
    pub sub_customer_id: Option<String>,
    pub product_id: String,
    pub barcode: String,
    /// Units returned to stock.
    pub quantity: i64,
    /// Amount credited back in kuruş.
    pub refund_kurus: i64,
    pub status: RefundStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
