//! Response types and error mapping for the engine's HTTP surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::config::JurisdictionRules;
use crate::error::EngineError;
use crate::models::Policy;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            EngineError::ConfigurationMissing { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_MISSING")
            }
            EngineError::JurisdictionConfigError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "JURISDICTION_CONFIG_ERROR")
            }
            EngineError::InvalidDayCount { .. } => (StatusCode::BAD_REQUEST, "INVALID_DAY_COUNT"),
            EngineError::InvalidWeek { .. } => (StatusCode::BAD_REQUEST, "INVALID_WEEK"),
            EngineError::InvalidLeaveYearAnchor { .. } => {
                (StatusCode::BAD_REQUEST, "INVALID_LEAVE_YEAR_ANCHOR")
            }
            EngineError::InvalidPeriod { .. } => (StatusCode::BAD_REQUEST, "INVALID_PERIOD"),
            EngineError::UnknownTimezone { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_TIMEZONE"),
            EngineError::Store { .. } => (StatusCode::BAD_GATEWAY, "STORE_ERROR"),
        };
        ApiErrorResponse {
            status,
            error: ApiError::new(code, message),
        }
    }
}

/// Response body for `POST /policy/resolve`: the resolved policy plus the
/// static rule bundle for the requested jurisdiction, when known.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyResolveResponse {
    /// The resolved effective policy.
    pub policy: Policy,
    /// The known-jurisdiction rule bundle, if the code is in the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction_rules: Option<JurisdictionRules>,
}
