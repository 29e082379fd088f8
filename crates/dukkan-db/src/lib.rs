//! # dukkan-db: SQLite Storage for Dukkan
//!
//! Connection pooling, embedded migrations, per-entity repositories, and
//! the transactional ledger flows.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          dukkan-db                                      │
//! │                                                                         │
//! │  Database (pool handle)                                                 │
//! │  ├── products() / customers() / sales() / debts() / payments()         │
//! │  │   / refunds() / register()    ── per-entity repositories            │
//! │  │                                                                      │
//! │  └── ledger()                    ── LedgerService: the multi-entity     │
//! │                                     flows (sale+stock+debt,            │
//! │                                     payment allocation, refund)        │
//! │                                     each inside ONE transaction        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories are thin single-table accessors. Anything that touches more
//! than one table in one logical operation goes through [`service::LedgerService`]
//! so a mid-flight failure can never leave stock decremented without the
//! matching sale or debt row.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::{
    LedgerService, NewPayment, NewRefund, NewSale, NewSaleItem, PaymentOutcome, RefundOutcome,
    SaleOutcome,
};
