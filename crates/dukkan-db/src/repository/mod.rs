//! # Repository Module
//!
//! Database repository implementations for Dukkan.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().find_by_barcode("8690000000001")                │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── find_by_barcode(&self, barcode)                                   │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── update(&self, product)                                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories are single-table. Flows that touch multiple tables in one
//! logical step (sale + stock + debt, payment allocation, refund) belong to
//! [`crate::service::LedgerService`], which runs them in one transaction.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and stock
//! - [`customer::CustomerRepository`] - Customers and sub-customer accounts
//! - [`sale::SaleRepository`] - Sale and sale item reads
//! - [`debt::DebtRepository`] - Debt CRUD and manual edits
//! - [`payment::PaymentRepository`] - Payment rows and ledger totals
//! - [`refund::RefundRepository`] - Refund rows
//! - [`register::RegisterRepository`] - Daily register summary

pub mod customer;
pub mod debt;
pub mod payment;
pub mod product;
pub mod refund;
pub mod register;
pub mod sale;

use uuid::Uuid;

/// Generates a new UUID v4 entity ID.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
