use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers used in logs. The wire format
// carries only the human-readable message, which clients match on.

/// Stable error code constants.
pub mod error_code {
    pub const INVALID_ACTION: &str = "INVALID_ACTION";
    pub const SHEET_NOT_FOUND: &str = "SHEET_NOT_FOUND";
    pub const ID_NOT_FOUND: &str = "ID_NOT_FOUND";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── GatewayError ────────────────────────────────────────────────────

/// Flat error type for every gateway operation.
///
/// Lookup failures (`SheetNotFound`, `IdNotFound`) are reported as an
/// unsuccessful outcome:
///
/// ```json
/// {"success": false, "error": "ID not found"}
/// ```
///
/// Every other variant is a fault and renders as `{"error": "..."}`.
/// The HTTP status is always 200; the body carries the outcome.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Unrecognized or missing action parameter.
    #[error("Invalid action")]
    InvalidAction,

    /// Target sheet does not exist (delete/update only).
    #[error("Sheet not found")]
    SheetNotFound,

    /// No row carries the requested id.
    #[error("ID not found")]
    IdNotFound,

    /// Malformed body or a failed presence check.
    #[error("{0}")]
    BadRequest(String),

    /// Sheet store failure.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error.
    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::InvalidAction => error_code::INVALID_ACTION,
            GatewayError::SheetNotFound => error_code::SHEET_NOT_FOUND,
            GatewayError::IdNotFound => error_code::ID_NOT_FOUND,
            GatewayError::BadRequest(_) => error_code::BAD_REQUEST,
            GatewayError::Storage(_) => error_code::STORAGE_ERROR,
            GatewayError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// Whether this error is a lookup miss rather than a fault.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, GatewayError::SheetNotFound | GatewayError::IdNotFound)
    }

    /// JSON body for this error.
    pub fn to_json(&self) -> serde_json::Value {
        if self.is_lookup_miss() {
            serde_json::json!({
                "success": false,
                "error": self.to_string(),
            })
        } else {
            serde_json::json!({
                "error": self.to_string(),
            })
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self.to_json())).into_response()
    }
}
