//! # dukkan-core: Pure Business Logic for Dukkan
//!
//! This crate is the **heart** of Dukkan, a small-business retail ledger.
//! It contains all business rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dukkan Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/api-server)                   │   │
//! │  │    /api/sales ── /api/payments ── /api/refunds ── /api/debts    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ dukkan-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ allocate  │  │   rules   │  │   │
//! │  │   │   Debt    │  │  (kuruş)  │  │  refund   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    dukkan-db (Database Layer)                   │   │
//! │  │        SQLite repositories, transactional ledger flows          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Debt, Payment, Refund, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - Debt/payment/refund reconciliation rules
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output; IDs and timestamps are
//!    passed in, never generated here
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in kuruş (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single sale.
///
/// ## Business Reason
/// Prevents runaway requests and keeps receipts printable.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity of a single item in a sale.
///
/// ## Business Reason
/// Prevents accidental over-selling (e.g., scanning 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
