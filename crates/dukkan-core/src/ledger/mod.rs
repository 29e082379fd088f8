//! # Ledger Module
//!
//! Customer ledger reconciliation rules: how debts arise from credit sales,
//! how payments pay them down, how refunds offset them, and when an account
//! counts as closed.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Control Flow                                  │
//! │                                                                         │
//! │  Sale (is_debt = true)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Debt { amount = sale.total, description = "N adet X, ..." }           │
//! │       │                                                                 │
//! │       ├──◄ Payment (debt_id set)     → applied to that debt            │
//! │       ├──◄ Payment (no debt_id)      → allocated oldest-first          │
//! │       │                                                                 │
//! │       └──◄ Refund → stock restored + offsetting "Geri Ödeme" payment   │
//! │                                                                         │
//! │  SubCustomer: Active ──► Inactive (closed, terminal)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything in this module is pure: callers pass in the debts, aggregates,
//! IDs and timestamps; the functions return plans and outcomes for the
//! storage layer to persist atomically.

pub mod account;
pub mod allocation;
pub mod debt;
pub mod refund;

pub use account::check_status_transition;
pub use allocation::{allocate_oldest_first, Allocation, AllocationOutcome};
pub use debt::{apply_to_debt, debt_description, debt_from_sale};
pub use refund::{plan_refund, RefundContext, RefundPlan, REFUND_OFFSET_DESCRIPTION};
