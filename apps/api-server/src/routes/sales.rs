//! Sale endpoints. POST delegates to the transactional ledger flow.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use dukkan_core::{Debt, PaymentType, Sale, SaleItem};
use dukkan_db::{NewSale, NewSaleItem};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SaleItemRequest {
    pub barcode: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub customer_id: Option<String>,
    pub sub_customer_id: Option<String>,
    pub items: Vec<SaleItemRequest>,
    #[serde(default = "default_payment_type")]
    pub payment_type: PaymentType,
    /// Credit sale: opens a debt for the customer.
    #[serde(default)]
    pub is_debt: bool,
}

fn default_payment_type() -> PaymentType {
    PaymentType::Cash
}

#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
    pub debt: Option<Debt>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub customer_id: Option<String>,
    pub limit: Option<u32>,
}

/// POST /api/sales
///
/// Stock decrement, sale row, item rows, and the optional debt all commit
/// together or not at all.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateSaleRequest>,
) -> Result<Json<SaleResponse>, ApiError> {
    let outcome = state
        .db
        .ledger()
        .create_sale(NewSale {
            customer_id: req.customer_id,
            sub_customer_id: req.sub_customer_id,
            items: req
                .items
                .into_iter()
                .map(|i| NewSaleItem {
                    barcode: i.barcode,
                    quantity: i.quantity,
                })
                .collect(),
            payment_type: req.payment_type,
            is_debt: req.is_debt,
        })
        .await?;

    Ok(Json(SaleResponse {
        sale: outcome.sale,
        items: outcome.items,
        debt: outcome.debt,
    }))
}

/// GET /api/sales?customer_id=&limit=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    let limit = query.limit.unwrap_or(100).min(500);

    let sales = match query.customer_id {
        Some(customer_id) => {
            state
                .db
                .sales()
                .list_for_customer(&customer_id, limit)
                .await?
        }
        None => state.db.sales().list_recent(limit).await?,
    };

    Ok(Json(sales))
}
