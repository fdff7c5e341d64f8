//! # API Errors
//!
//! Every failure leaves the server as a status code and a field-keyed body:
//!
//! ```text
//! HTTP/1.1 400 Bad Request
//! {
//!   "code": "INSUFFICIENT_FUNDS",
//!   "error": { "cash_in_hand": ["Insufficient cash_in_hand: available 300.00, requested 500.00"] }
//! }
//! ```
//!
//! | Source                          | Status | code                     |
//! |---------------------------------|--------|--------------------------|
//! | `CoreError` (any kind)          | 400    | the rejection's kind     |
//! | Malformed JSON / query string   | 400    | `VALIDATION_FAILED`      |
//! | `DbError::NotFound`, missing id | 404    | `NOT_FOUND`              |
//! | any other `DbError`             | 500    | `INTERNAL_ERROR`         |
//!
//! Storage failure details are logged, never returned.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mill_core::{CoreError, ErrorKind};
use mill_db::DbError;
use serde::Serialize;
use tracing::error;

/// Key used when a message is not about one field.
const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The request body or query string could not be decoded.
    #[error("{message}")]
    Malformed { field: &'static str, message: String },
}

impl ApiError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Db(DbError::Rejected(err))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    error: BTreeMap<String, Vec<String>>,
}

impl ErrorBody {
    fn new(code: &'static str, field: &str, message: String) -> Self {
        ErrorBody {
            code,
            error: BTreeMap::from([(field.to_string(), vec![message])]),
        }
    }
}

fn kind_code(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ValidationFailed => "VALIDATION_FAILED",
        ErrorKind::InsufficientFunds => "INSUFFICIENT_FUNDS",
        ErrorKind::InsufficientInventory => "INSUFFICIENT_INVENTORY",
        ErrorKind::ConstraintViolation => "CONSTRAINT_VIOLATION",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Db(DbError::Rejected(err)) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new(kind_code(err.kind()), err.field(), err.message()),
            ),
            ApiError::Db(DbError::UniqueViolation { field, value }) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new(
                    kind_code(ErrorKind::ConstraintViolation),
                    &field,
                    format!("{field} '{value}' already exists"),
                ),
            ),
            ApiError::Db(DbError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", "id", format!("{entity} not found: {id}")),
            ),
            ApiError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", "id", format!("{entity} not found: {id}")),
            ),
            ApiError::Malformed { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new(kind_code(ErrorKind::ValidationFailed), field, message),
            ),
            ApiError::Db(err) => {
                error!(error = %err, "Storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(
                        "INTERNAL_ERROR",
                        NON_FIELD_ERRORS,
                        "internal server error".to_string(),
                    ),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
