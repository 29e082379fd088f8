//! Customer and sub-customer endpoints.
//!
//! Sub-customer status is the one-way door: the PATCH handler routes the
//! requested status through the repository, which enforces that a closed
//! account never reopens.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use dukkan_core::validation::validate_name;
use dukkan_core::{AccountStatus, CoreError, Customer, SubCustomer};
use dukkan_db::repository::generate_id;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubCustomerRequest {
    pub name: String,
}

/// Fields a sub-customer PATCH may change. Either or both.
#[derive(Debug, Deserialize)]
pub struct UpdateSubCustomerRequest {
    pub name: Option<String>,
    pub status: Option<AccountStatus>,
}

/// POST /api/customers
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<Json<Customer>, ApiError> {
    validate_name(&req.name).map_err(CoreError::from)?;

    let customer = Customer {
        id: generate_id(),
        name: req.name,
        phone: req.phone,
        address: req.address,
        is_active: true,
        created_at: Utc::now(),
    };

    let customer = state.db.customers().insert(&customer).await?;
    debug!(id = %customer.id, "Customer created");

    Ok(Json(customer))
}

/// GET /api/customers
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = state.db.customers().list().await?;
    Ok(Json(customers))
}

/// POST /api/customers/{id}/sub-customers
pub async fn create_sub_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(req): Json<CreateSubCustomerRequest>,
) -> Result<Json<SubCustomer>, ApiError> {
    validate_name(&req.name).map_err(CoreError::from)?;

    // 404 before the FK would reject it with a less useful message.
    state
        .db
        .customers()
        .get_by_id(&customer_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Customer not found: {}", customer_id)))?;

    let now = Utc::now();
    let sub = SubCustomer {
        id: generate_id(),
        customer_id,
        name: req.name,
        status: AccountStatus::Active,
        created_at: now,
        updated_at: now,
    };

    let sub = state.db.customers().insert_sub_customer(&sub).await?;
    Ok(Json(sub))
}

/// GET /api/customers/{id}/sub-customers
pub async fn list_sub_customers(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<SubCustomer>>, ApiError> {
    let subs = state.db.customers().list_sub_customers(&customer_id).await?;
    Ok(Json(subs))
}

/// PATCH /api/sub-customers/{id}
///
/// Attempting `status = "active"` on a closed account returns 400 with
/// "Kapalı hesap tekrar açılamaz: ..." and writes nothing, including any
/// rename carried in the same request.
pub async fn update_sub_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSubCustomerRequest>,
) -> Result<Json<SubCustomer>, ApiError> {
    if let Some(name) = &req.name {
        validate_name(name).map_err(CoreError::from)?;
    }

    let sub = state
        .db
        .customers()
        .update_sub_customer(&id, req.name.as_deref(), req.status)
        .await?;

    Ok(Json(sub))
}
