//! Refund endpoint: refund row + "Geri Ödeme" offset + stock restore.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use dukkan_core::{Payment, Refund};
use dukkan_db::NewRefund;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRefundRequest {
    pub debt_id: String,
    pub barcode: String,
    pub quantity: i64,
    pub refund_kurus: i64,
}

#[derive(Debug, Serialize)]
pub struct RefundResponse {
    pub refund: Refund,
    pub offset_payment: Payment,
    pub closed_account: bool,
}

/// POST /api/refunds
///
/// 400 `REFUND_EXCEEDS_DEBT` when prior refunds plus this one would
/// overshoot the debt.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRefundRequest>,
) -> Result<Json<RefundResponse>, ApiError> {
    let outcome = state
        .db
        .ledger()
        .record_refund(NewRefund {
            debt_id: req.debt_id,
            barcode: req.barcode,
            quantity: req.quantity,
            refund_kurus: req.refund_kurus,
        })
        .await?;

    Ok(Json(RefundResponse {
        refund: outcome.refund,
        offset_payment: outcome.offset_payment,
        closed_account: outcome.closed_account,
    }))
}
