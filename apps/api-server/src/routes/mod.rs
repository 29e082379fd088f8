//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Route Map                                       │
//! │                                                                         │
//! │  /api/health                 GET    liveness                           │
//! │  /api/products               POST   create, GET list                   │
//! │  /api/products/{barcode}     GET    scan-path lookup                   │
//! │  /api/customers              POST   create, GET list                   │
//! │  /api/customers/{id}/sub-customers  POST create, GET list              │
//! │  /api/sub-customers/{id}     PATCH  open/close account                 │
//! │  /api/sales                  POST   create (tx), GET list              │
//! │  /api/payments               POST   targeted / allocated (tx),         │
//! │                              GET    history + paid/refunded totals     │
//! │  /api/payments/{id}          DELETE cancel (soft)                      │
//! │  /api/refunds                POST   refund (tx)                        │
//! │  /api/debts                  GET    list, POST manual entry            │
//! │  /api/debts/{id}             PATCH  hand-edit                          │
//! │  /api/register/daily         GET    kasa summary                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod customers;
pub mod debts;
pub mod health;
pub mod payments;
pub mod products;
pub mod refunds;
pub mod register;
pub mod sales;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route(
            "/api/products",
            post(products::create).get(products::list),
        )
        .route("/api/products/{barcode}", get(products::get_by_barcode))
        .route(
            "/api/customers",
            post(customers::create).get(customers::list),
        )
        .route(
            "/api/customers/{id}/sub-customers",
            post(customers::create_sub_customer).get(customers::list_sub_customers),
        )
        .route(
            "/api/sub-customers/{id}",
            patch(customers::update_sub_customer),
        )
        .route("/api/sales", post(sales::create).get(sales::list))
        .route("/api/payments", post(payments::create).get(payments::list))
        .route("/api/payments/{id}", delete(payments::cancel))
        .route("/api/refunds", post(refunds::create))
        .route("/api/debts", get(debts::list).post(debts::create_manual))
        .route("/api/debts/{id}", patch(debts::patch))
        .route("/api/register/daily", get(register::daily))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
