//! Product endpoints: the catalog behind the scan path.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use dukkan_core::validation::{validate_barcode, validate_name, validate_price_kurus};
use dukkan_core::{CoreError, Product};
use dukkan_db::repository::generate_id;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub barcode: String,
    pub name: String,
    pub price_kurus: i64,
    #[serde(default)]
    pub purchase_price_kurus: i64,
    #[serde(default)]
    pub stock: i64,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub supplier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub limit: Option<u32>,
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    validate_barcode(&req.barcode).map_err(CoreError::from)?;
    validate_name(&req.name).map_err(CoreError::from)?;
    validate_price_kurus(req.price_kurus).map_err(CoreError::from)?;
    validate_price_kurus(req.purchase_price_kurus).map_err(CoreError::from)?;
    if req.stock < 0 {
        return Err(ApiError::validation("stock cannot be negative"));
    }

    let now = Utc::now();
    let product = Product {
        id: generate_id(),
        barcode: req.barcode,
        name: req.name,
        price_kurus: req.price_kurus,
        purchase_price_kurus: req.purchase_price_kurus,
        stock: req.stock,
        category: req.category,
        brand: req.brand,
        supplier: req.supplier,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let product = state.db.products().insert(&product).await?;
    debug!(barcode = %product.barcode, "Product created");

    Ok(Json(product))
}

/// GET /api/products?q=&limit=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let limit = query.limit.unwrap_or(100).min(500);
    let products = state.db.products().list(query.q.as_deref(), limit).await?;
    Ok(Json(products))
}

/// GET /api/products/{barcode} - the scan path.
pub async fn get_by_barcode(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .products()
        .find_by_barcode(&barcode)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Product not found: {}", barcode)))?;

    Ok(Json(product))
}
