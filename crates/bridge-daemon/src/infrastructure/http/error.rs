//! Structured JSON errors for the HTTP gateway.
//!
//! Every failure leaves the daemon with the same body shape:
//! `{"error": <stable code>, "message": <human text>}`.  Client apps branch
//! on the code; the message is for humans reading logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::application::{PermissionError, RegistryError};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request parameter.  Guaranteed to have caused
    /// no side effect.
    #[error("{0}")]
    BadRequest(String),
    /// The permission gate denied a privileged route.
    #[error("{0}")]
    Forbidden(String),
    /// Unknown route or unknown plugin id.
    #[error("{0}")]
    NotFound(String),
    /// Device emission failed after the request was accepted.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<PermissionError> for ApiError {
    fn from(e: PermissionError) -> Self {
        Self::Forbidden(e.to_string())
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        Self::NotFound(e.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_variants() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_permission_error_maps_to_forbidden() {
        let api: ApiError = PermissionError::Forbidden("actions".into()).into();
        assert!(matches!(api, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_unknown_plugin_maps_to_not_found() {
        let api: ApiError = RegistryError::UnknownPlugin("ghost".into()).into();
        assert!(matches!(api, ApiError::NotFound(_)));
    }
}
