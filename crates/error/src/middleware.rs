//! # Error Rendering
//!
//! Converts [`AppError`] into HTTP responses.
//!
//! ## Usage
//!
//! ```rust
//! use error::{AppError, ErrorHandler};
//!
//! let handler = ErrorHandler::new(false);
//! let response = handler.to_response(&AppError::not_found("Lead not found"));
//! assert_eq!(response.status(), 404);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{response::ErrorBody, AppError};

/// Process-wide switch for exposing internal error messages in 5xx bodies.
static INCLUDE_DETAILS: AtomicBool = AtomicBool::new(false);

/// Error handler that converts errors to HTTP responses.
#[derive(Clone, Copy, Debug)]
pub struct ErrorHandler {
    /// Whether to include internal error details in 5xx responses.
    pub include_details: bool,
}

impl ErrorHandler {
    /// Create a new error handler.
    #[inline]
    pub fn new(include_details: bool) -> Self {
        Self {
            include_details,
        }
    }

    /// Set the process-wide detail flag used by `IntoResponse for AppError`.
    pub fn install(include_details: bool) { INCLUDE_DETAILS.store(include_details, Ordering::Relaxed); }

    /// The handler configured through [`ErrorHandler::install`].
    pub fn current() -> Self { Self::new(INCLUDE_DETAILS.load(Ordering::Relaxed)) }

    /// Build the JSON body for an error.
    pub fn to_body(&self, err: &AppError) -> ErrorBody {
        let error = if err.is_server_error() && !self.include_details {
            "Internal server error".to_string()
        }
        else {
            err.message()
        };

        let mut extra = serde_json::Map::new();
        if let AppError::Conflict {
            existing: Some(existing),
            ..
        } = err
        {
            extra.insert(
                existing.field.to_string(),
                serde_json::Value::String(existing.id.clone()),
            );
        }

        ErrorBody {
            error,
            code: err.code().to_string(),
            details: err.details().map(<[_]>::to_vec),
            extra,
        }
    }

    /// Convert an error to a response.
    pub fn to_response(&self, err: &AppError) -> Response {
        let status = err.status();
        let body = self.to_body(err);

        if status.is_server_error() {
            tracing::error!(code = err.code(), error = %err, "Request failed");
        }
        else {
            tracing::debug!(code = err.code(), error = %err, "Request rejected");
        }

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response { ErrorHandler::current().to_response(&self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_handler_status() {
        let handler = ErrorHandler::new(false);
        let response = handler.to_response(&AppError::not_found("Lead not found"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_message_hidden_without_details() {
        let body = ErrorHandler::new(false).to_body(&AppError::database("relation \"leads\" does not exist"));
        assert_eq!(body.error, "Internal server error");
        assert_eq!(body.code, "DATABASE_ERROR");
    }

    #[test]
    fn test_internal_message_shown_with_details() {
        let body = ErrorHandler::new(true).to_body(&AppError::internal("boom"));
        assert_eq!(body.error, "boom");
    }

    #[test]
    fn test_client_errors_keep_message() {
        let body = ErrorHandler::new(false).to_body(&AppError::forbidden("Insufficient permissions"));
        assert_eq!(body.error, "Insufficient permissions");
    }

    #[test]
    fn test_conflict_reference_in_body() {
        let body = ErrorHandler::new(false).to_body(&AppError::conflict_with(
            "Visitor with this phone already exists",
            "visitor_id",
            "v-1",
        ));
        assert_eq!(body.extra.get("visitor_id").unwrap(), "v-1");
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = ErrorHandler::new(false).to_response(&AppError::JwtExpired);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::WWW_AUTHENTICATE)
                .unwrap(),
            "Bearer"
        );
    }
}
