//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "missing required fields: promoters, venue",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                |
/// |-----------|------------------|----------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request            |
/// | 2000–2999 | Not Found        | 404 Not Found              |
/// | 3000–3999 | Server / Storage | 500 Internal Server Error  |
/// | 4000–4999 | Auth             | 401 / 403                  |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A draft or patch failed validation before any store call.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Event with the given ID was not found.
    #[error("event not found: {0}")]
    EventNotFound(uuid::Uuid),

    /// Message with the given ID (or for the given event) was not found.
    #[error("message not found: {0}")]
    MessageNotFound(uuid::Uuid),

    /// Payment record with the given ID was not found.
    #[error("payment not found: {0}")]
    PaymentNotFound(uuid::Uuid),

    /// Backing store failure. Never retried by the gateway; the caller
    /// decides whether to retry.
    #[error("storage error: {0}")]
    Storage(String),

    /// The event row was persisted but generating its dependent message
    /// or payment rows failed. The event exists without dependents;
    /// recovery is the regenerate endpoint.
    #[error("event {event_id} saved but dependent generation failed: {detail}")]
    PartialFailure {
        /// Event whose dependents are missing or incomplete.
        event_id: uuid::Uuid,
        /// What went wrong while generating dependents.
        detail: String,
    },

    /// Request carried no usable identity headers.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Caller's role does not permit the operation.
    #[error("manager role required: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::EventNotFound(_) => 2001,
            Self::MessageNotFound(_) => 2002,
            Self::PaymentNotFound(_) => 2003,
            Self::Internal(_) => 3000,
            Self::Storage(_) => 3001,
            Self::PartialFailure { .. } => 3002,
            Self::Unauthenticated(_) => 4001,
            Self::Forbidden(_) => 4003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::EventNotFound(_) | Self::MessageNotFound(_) | Self::PaymentNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Storage(_) | Self::PartialFailure { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = GatewayError::Validation("missing required fields: venue".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = GatewayError::EventNotFound(uuid::Uuid::new_v4());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
    }

    #[test]
    fn forbidden_maps_to_403() {
        let err = GatewayError::Forbidden("delete event".to_string());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.error_code(), 4003);
    }

    #[test]
    fn partial_failure_names_the_event() {
        let id = uuid::Uuid::new_v4();
        let err = GatewayError::PartialFailure {
            event_id: id,
            detail: "storage error: connection reset".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains(&id.to_string()));
    }
}
