//! # API Response Types
//!
//! The single response envelope used by every endpoint, plus the error body.
//!
//! ## Response Format
//!
//! ```json
//! {
//!   "data": { ... },
//!   "pagination": { "current_page": 1, "total_pages": 3, ... }
//! }
//! ```
//!
//! Errors are rendered as:
//!
//! ```json
//! { "error": "Validation failed", "code": "VALIDATION_ERROR", "details": [{ "field": "phone", "message": "..." }] }
//! ```

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PaginationMeta {
    /// Current page number (1-indexed).
    pub current_page: u64,

    /// Total number of pages.
    pub total_pages: u64,

    /// Total number of matching records.
    pub total_records: u64,

    /// Has next page.
    pub has_next: bool,

    /// Has previous page.
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Maximum allowed page number to prevent integer overflow in offset calculation
    pub const MAX_PAGE: u64 = 1_000_000;

    /// Create pagination metadata.
    ///
    /// `page` is clamped to `1..=MAX_PAGE`; a zero `per_page` yields zero pages.
    pub fn new(page: u64, per_page: u64, total_records: u64) -> Self {
        let page = if page > Self::MAX_PAGE {
            tracing::warn!(
                "Page number {} exceeds maximum allowed value {}, clamping to max",
                page,
                Self::MAX_PAGE
            );
            Self::MAX_PAGE
        }
        else {
            page.max(1)
        };

        let total_pages = if per_page == 0 {
            0
        }
        else {
            total_records.div_ceil(per_page)
        };

        Self {
            current_page: page,
            total_pages,
            total_records,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// The canonical success envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse<T> {
    /// Response data.
    pub data: T,

    /// Pagination, present on list endpoints only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    /// Wrap data without pagination.
    #[inline]
    pub fn ok(data: T) -> Self {
        Self {
            data,
            pagination: None,
        }
    }

    /// Wrap a page of data.
    #[inline]
    pub fn paginated(data: T, pagination: PaginationMeta) -> Self {
        Self {
            data,
            pagination: Some(pagination),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response { Json(self).into_response() }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending field
    pub field:   String,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    #[inline]
    pub fn new(field: impl ToString, message: impl ToString) -> Self {
        Self {
            field:   field.to_string(),
            message: message.to_string(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,

    /// Stable machine-readable code
    pub code: String,

    /// Field-level details for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,

    /// Extra top-level keys, e.g. `existing_lead_id` on conflicts
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(2, 50, 120);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let meta = PaginationMeta::new(1, 50, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_pagination_meta_clamps_page() {
        assert_eq!(PaginationMeta::new(0, 10, 5).current_page, 1);
        assert_eq!(
            PaginationMeta::new(u64::MAX, 10, 5).current_page,
            PaginationMeta::MAX_PAGE
        );
    }

    #[test]
    fn test_envelope_without_pagination() {
        let value = serde_json::to_value(ApiResponse::ok(json!({"id": 1}))).unwrap();
        assert_eq!(value, json!({"data": {"id": 1}}));
    }

    #[test]
    fn test_envelope_with_pagination() {
        let value = serde_json::to_value(ApiResponse::paginated(
            vec![1, 2],
            PaginationMeta::new(1, 2, 3),
        ))
        .unwrap();
        assert_eq!(value["pagination"]["total_records"], 3);
        assert_eq!(value["pagination"]["current_page"], 1);
        assert_eq!(value["pagination"]["has_next"], true);
    }

    #[test]
    fn test_error_body_flattens_extra() {
        let mut extra = serde_json::Map::new();
        extra.insert("existing_lead_id".to_string(), json!("abc"));
        let body = ErrorBody {
            error: "Lead already exists for this visitor today".to_string(),
            code: "CONFLICT".to_string(),
            details: None,
            extra,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["existing_lead_id"], "abc");
        assert!(value.get("details").is_none());
    }
}
