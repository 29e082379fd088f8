//! Debt endpoints: listing, manual entry, and the hand-edit path.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use dukkan_core::validation::validate_amount_kurus;
use dukkan_core::{CoreError, Debt, DebtKind, RecordStatus};
use dukkan_db::repository::debt::DebtPatch;
use dukkan_db::repository::generate_id;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub customer_id: String,
    /// When true, only unsettled debts, oldest first.
    #[serde(default)]
    pub open_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateDebtRequest {
    pub customer_id: String,
    pub sub_customer_id: Option<String>,
    pub amount_kurus: i64,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// PATCH body. Absent fields are left untouched; an explicit
/// `"due_date": null` clears the date.
#[derive(Debug, Deserialize)]
pub struct PatchDebtRequest {
    pub amount_kurus: Option<i64>,
    pub is_paid: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// Outer `Some` means the field was present in the JSON; the inner
/// `Option` carries the value-or-null.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NaiveDate>::deserialize(deserializer).map(Some)
}

/// GET /api/debts?customer_id=&open_only=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Debt>>, ApiError> {
    let debts = if query.open_only {
        state
            .db
            .debts()
            .open_debts_oldest_first(&query.customer_id)
            .await?
    } else {
        state.db.debts().list_for_customer(&query.customer_id).await?
    };

    Ok(Json(debts))
}

/// POST /api/debts - manual debt entry (opening balance etc.).
pub async fn create_manual(
    State(state): State<AppState>,
    Json(req): Json<CreateDebtRequest>,
) -> Result<Json<Debt>, ApiError> {
    validate_amount_kurus(req.amount_kurus).map_err(CoreError::from)?;

    state
        .db
        .customers()
        .get_by_id(&req.customer_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Customer not found: {}", req.customer_id)))?;

    let debt = Debt {
        id: generate_id(),
        customer_id: req.customer_id,
        sub_customer_id: req.sub_customer_id,
        amount_kurus: req.amount_kurus,
        paid_amount_kurus: 0,
        is_paid: false,
        sale_id: None,
        kind: DebtKind::Manual,
        description: req.description,
        due_date: req.due_date,
        status: RecordStatus::Active,
        created_at: Utc::now(),
    };

    let debt = state.db.debts().insert(&debt).await?;
    Ok(Json(debt))
}

/// PATCH /api/debts/{id}
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PatchDebtRequest>,
) -> Result<Json<Debt>, ApiError> {
    if let Some(amount) = req.amount_kurus {
        validate_amount_kurus(amount).map_err(CoreError::from)?;
    }

    let debt = state
        .db
        .debts()
        .patch(
            &id,
            DebtPatch {
                amount_kurus: req.amount_kurus,
                is_paid: req.is_paid,
                due_date: req.due_date,
                description: None,
            },
        )
        .await?;

    Ok(Json(debt))
}
