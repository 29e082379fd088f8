//! # Dukkan API Server
//!
//! HTTP/JSON layer over the Dukkan ledger.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  axum handlers (this crate)                                             │
//! │     │  parse + validate request, map errors to status codes            │
//! │     ▼                                                                   │
//! │  dukkan-db    repositories + LedgerService (transactions)              │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  dukkan-core  ledger math, no I/O                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The router is built by [`app`] from an injected [`AppState`], so tests
//! construct one over an in-memory database and drive it with
//! `tower::ServiceExt::oneshot` without binding a port.

pub mod config;
pub mod error;
pub mod routes;

use axum::Router;

use dukkan_db::Database;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Builds the application router over the given state.
pub fn app(state: AppState) -> Router {
    routes::router(state)
}
