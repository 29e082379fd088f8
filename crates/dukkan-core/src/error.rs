//! # Error Types
//!
//! Domain-specific error types for dukkan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  dukkan-core errors (this file)                                        │
//! │  ├── CoreError        - Ledger rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  dukkan-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (apps/api-server)                                          │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (barcode, debt ID, amounts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Ledger and business rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found by barcode or ID.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Insufficient stock to complete a sale.
    ///
    /// ## When This Occurs
    /// - Selling more than available stock
    /// - Stock is checked (and decremented) inside the sale transaction, so
    ///   this error always leaves stock unchanged
    #[error("Insufficient stock for {barcode}: available {available}, requested {requested}")]
    InsufficientStock {
        barcode: String,
        available: i64,
        requested: i64,
    },

    /// Debt referenced by a payment or refund does not exist.
    ///
    /// A payment naming an unknown debt is a caller error; it must never
    /// be swallowed as a no-op.
    #[error("Debt not found: {0}")]
    DebtNotFound(String),

    /// Customer cannot be found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Sub-customer cannot be found.
    #[error("Sub-customer not found: {0}")]
    SubCustomerNotFound(String),

    /// Refund would exceed the debt it is issued against.
    ///
    /// The sum of all refunds for a debt (including the requested one) must
    /// never exceed the debt amount.
    #[error("Refund of {requested_kurus} kuruş exceeds debt {debt_id}: amount {debt_kurus}, already refunded {already_refunded_kurus}")]
    RefundExceedsDebt {
        debt_id: String,
        debt_kurus: i64,
        requested_kurus: i64,
        already_refunded_kurus: i64,
    },

    /// A closed (inactive) sub-customer account cannot be reopened.
    #[error("Kapalı hesap tekrar açılamaz: {sub_customer_id}")]
    AccountClosed { sub_customer_id: String },

    /// A credit sale needs a customer to attach the debt to.
    #[error("Credit sale requires a customer")]
    DebtWithoutCustomer,

    /// Payment amount is invalid.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when request input doesn't meet requirements, before any
/// business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate barcode).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
