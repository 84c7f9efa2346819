//! # Rejection Handlers
//!
//! Converts Axum extractor rejections into [`AppError`] so malformed requests
//! use the same error body as every other failure.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};

use crate::AppError;

/// Handle JSON deserialization errors.
///
/// A message like "missing field `phone` at line 1 column 2" becomes a validation
/// error on that field; anything else is a plain bad request.
pub fn handle_json_rejection(rejection: JsonRejection) -> AppError {
    let error_message = rejection.body_text();

    match missing_field_name(&error_message) {
        Some(field) => AppError::invalid_field(field, format!("{} is required", field)),
        None => AppError::bad_request(&error_message),
    }
}

/// Handle query string deserialization errors.
pub fn handle_query_rejection(rejection: QueryRejection) -> AppError {
    AppError::bad_request(format!("Invalid query string: {}", rejection.body_text()))
}

/// Handle path parameter errors, e.g. a malformed UUID.
pub fn handle_path_rejection(rejection: PathRejection) -> AppError {
    AppError::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
}

fn missing_field_name(message: &str) -> Option<&str> {
    let start = message.find("missing field `")? + "missing field `".len();
    let end = message[start ..].find('`')?;
    Some(&message[start .. start + end])
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self { handle_json_rejection(rejection) }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self { handle_query_rejection(rejection) }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self { handle_path_rejection(rejection) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_name() {
        assert_eq!(
            missing_field_name("Failed to deserialize the JSON body: missing field `phone` at line 1 column 2"),
            Some("phone")
        );
        assert_eq!(missing_field_name("expected value at line 1 column 1"), None);
    }
}
