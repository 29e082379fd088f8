//! Daily register (kasa) summary endpoint.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use dukkan_db::repository::register::DailySummary;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// Calendar day, "YYYY-MM-DD". Defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

/// GET /api/register/daily?date=2026-08-24
pub async fn daily(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailySummary>, ApiError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let summary = state.db.register().daily_summary(date).await?;
    Ok(Json(summary))
}
