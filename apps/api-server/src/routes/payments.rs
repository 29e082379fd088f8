//! Payment endpoints.
//!
//! With a `debt_id` the full amount lands on that one debt; without one it
//! walks the customer's open debts oldest-first. Anything that found no
//! debt comes back as `unallocated_kurus` so the operator sees it.
//! The history endpoint carries the paid/refunded totals alongside the
//! rows; cancelling a payment drops it out of those totals.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use dukkan_core::{Payment, PaymentType};
use dukkan_db::NewPayment;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub customer_id: String,
    pub sub_customer_id: Option<String>,
    pub debt_id: Option<String>,
    pub amount_kurus: i64,
    #[serde(default = "default_payment_type")]
    pub payment_type: PaymentType,
    pub description: Option<String>,
}

fn default_payment_type() -> PaymentType {
    PaymentType::Cash
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub customer_id: String,
    /// Narrows the totals to one sub-account.
    pub sub_customer_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentListResponse {
    pub payments: Vec<Payment>,
    pub total_paid_kurus: i64,
    pub total_refunded_kurus: i64,
    pub net_paid_kurus: i64,
}

#[derive(Debug, Serialize)]
pub struct PaymentAllocation {
    pub debt_id: String,
    pub applied_kurus: i64,
    pub is_paid: bool,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub payment: Payment,
    pub allocations: Vec<PaymentAllocation>,
    pub unallocated_kurus: i64,
}

/// POST /api/payments
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let outcome = state
        .db
        .ledger()
        .record_payment(NewPayment {
            customer_id: req.customer_id,
            sub_customer_id: req.sub_customer_id,
            debt_id: req.debt_id,
            amount_kurus: req.amount_kurus,
            payment_type: req.payment_type,
            description: req.description,
        })
        .await?;

    Ok(Json(PaymentResponse {
        payment: outcome.payment,
        allocations: outcome
            .allocations
            .into_iter()
            .map(|a| PaymentAllocation {
                debt_id: a.debt_id,
                applied_kurus: a.applied.kurus(),
                is_paid: a.is_paid,
            })
            .collect(),
        unallocated_kurus: outcome.unallocated_kurus,
    }))
}

/// GET /api/payments?customer_id=&sub_customer_id=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaymentListResponse>, ApiError> {
    let payments = state
        .db
        .payments()
        .list_for_customer(&query.customer_id)
        .await?;
    let totals = state
        .db
        .payments()
        .totals(&query.customer_id, query.sub_customer_id.as_deref())
        .await?;

    Ok(Json(PaymentListResponse {
        payments,
        total_paid_kurus: totals.total_paid_kurus,
        total_refunded_kurus: totals.total_refunded_kurus,
        net_paid_kurus: totals.net_paid().kurus(),
    }))
}

/// DELETE /api/payments/{id}
///
/// Soft cancel: the row stays in the history but drops out of the totals.
/// Any debt paydown the payment performed is not reversed here; that goes
/// through a debt hand-edit.
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    state.db.payments().cancel(&id).await?;

    let payment = state
        .db
        .payments()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Payment not found: {}", id)))?;

    Ok(Json(payment))
}
