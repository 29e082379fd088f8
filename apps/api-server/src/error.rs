//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Dukkan                                 │
//! │                                                                         │
//! │  Client                       Rust Backend                              │
//! │  ──────                       ────────────                              │
//! │                                                                         │
//! │  POST /api/sales                                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Handler: Result<Json<T>, ApiError>                                     │
//! │         │                                                               │
//! │         ├── DbError::NotFound ──────────► 404 NOT_FOUND                │
//! │         ├── CoreError::InsufficientStock ► 400 INSUFFICIENT_STOCK      │
//! │         ├── CoreError::Validation ──────► 400 VALIDATION_ERROR         │
//! │         └── anything internal ──────────► 500 generic message,         │
//! │                                               real cause only logged   │
//! │                                                                         │
//! │  ◄── { "error": "Product not found: 869...", "code": "NOT_FOUND" }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal errors never leak their message to the client; the raw cause
//! goes to the log under the same request span.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use dukkan_core::CoreError;
use dukkan_db::DbError;

/// API error returned from HTTP handlers.
///
/// ## Serialization
/// ```json
/// {
///   "error": "Product not found: 8690000000001",
///   "code": "NOT_FOUND"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Human-readable error message for display
    pub error: String,

    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// HTTP status, not serialized
    #[serde(skip)]
    pub status: StatusCode,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Requested quantity exceeds stock (400)
    InsufficientStock,

    /// Refund would exceed the debt (400)
    RefundExceedsDebt,

    /// Closed account cannot be reopened (400)
    AccountClosed,

    /// Payment amount / shape rejected (400)
    PaymentError,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            error: message.into(),
            code,
            status,
        }
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationError, message)
    }

    /// Creates an internal error with a generic client-facing message.
    pub fn internal() -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal,
            "Internal server error",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Converts ledger rule violations to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::ProductNotFound(_)
            | CoreError::DebtNotFound(_)
            | CoreError::CustomerNotFound(_)
            | CoreError::SubCustomerNotFound(_) => ApiError::not_found(err.to_string()),

            CoreError::InsufficientStock { .. } => ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::InsufficientStock,
                err.to_string(),
            ),

            CoreError::RefundExceedsDebt { .. } => ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::RefundExceedsDebt,
                err.to_string(),
            ),

            CoreError::AccountClosed { .. } => ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::AccountClosed,
                err.to_string(),
            ),

            CoreError::InvalidPaymentAmount { .. } | CoreError::DebtWithoutCustomer => {
                ApiError::new(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::PaymentError,
                    err.to_string(),
                )
            }

            CoreError::Validation(_) => ApiError::validation(err.to_string()),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::not_found(format!("{} not found: {}", entity, id))
            }

            DbError::UniqueViolation { field, .. } => {
                ApiError::validation(format!("{} already exists", field))
            }

            DbError::ForeignKeyViolation { message } => {
                tracing::error!(%message, "Foreign key violation");
                ApiError::validation("Invalid reference")
            }

            DbError::Core(core) => ApiError::from(core),

            DbError::ConnectionFailed(e) | DbError::MigrationFailed(e) | DbError::QueryFailed(e) => {
                tracing::error!(error = %e, "Database failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DatabaseError,
                    "Database operation failed",
                )
            }

            DbError::PoolExhausted => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                "Database pool exhausted",
            ),

            DbError::Internal(e) => {
                tracing::error!(error = %e, "Internal database error");
                ApiError::internal()
            }
        }
    }
}
