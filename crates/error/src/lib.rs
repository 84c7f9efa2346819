//! # Expo Leads Error Infrastructure
//!
//! Error types and API response envelopes shared by every crate in the workspace.

pub mod middleware;
pub mod rejection;
pub mod response;
pub mod traits;

pub use middleware::ErrorHandler;
pub use response::{ApiResponse, ErrorBody, FieldError, PaginationMeta};
pub use traits::ResultExt;

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Identifies the row that caused a conflict, rendered as an extra key in the error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictRef {
    /// Key name in the error body, e.g. `existing_lead_id`
    pub field: &'static str,
    /// Identifier of the existing row
    pub id:    String,
}

/// Main application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {message}")]
    NotFound {
        message: String,
    },

    #[error("BadRequest: {message}")]
    BadRequest {
        message: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    #[error("JwtExpired: Token expired")]
    JwtExpired,

    #[error("JwtInvalidToken: Invalid token")]
    JwtInvalidToken,

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    #[error("Conflict: {message}")]
    Conflict {
        message:  String,
        existing: Option<ConflictRef>,
    },

    #[error("Validation: {message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("Internal: {message}")]
    Internal {
        message: String,
    },

    #[error("Database: {message}")]
    Database {
        message: String,
    },

    #[error("IO: {message}")]
    Io {
        message: String,
    },

    #[error("Config: {message}")]
    Config {
        message: String,
    },

    #[error("Migration: {message}")]
    Migration {
        message: String,
    },
}

/// Seed operation result
#[derive(Debug, Clone)]
pub struct SeedResult {
    /// Number of records inserted
    pub inserted_count: usize,
    /// Seed name for logging
    pub seed_name:      String,
    /// Duration of the seed operation in milliseconds
    pub duration_ms:    u64,
    /// Any errors that occurred
    pub errors:         Vec<String>,
}

impl SeedResult {
    /// Creates a new successful seed result
    #[must_use]
    pub fn success(seed_name: &str, inserted: usize, duration_ms: u64) -> Self {
        Self {
            inserted_count: inserted,
            seed_name: seed_name.to_string(),
            duration_ms,
            errors: Vec::new(),
        }
    }

    /// Creates a seed result for a seed that had nothing to do
    #[must_use]
    pub fn skipped(seed_name: &str) -> Self { Self::success(seed_name, 0, 0) }

    /// Creates a new failed seed result
    #[must_use]
    pub fn with_error(seed_name: &str, error: &str) -> Self {
        Self {
            inserted_count: 0,
            seed_name:      seed_name.to_string(),
            duration_ms:    0,
            errors:         vec![error.to_string()],
        }
    }

    /// Returns true if the seed operation was successful
    #[must_use]
    pub fn is_success(&self) -> bool { self.errors.is_empty() }
}

impl AppError {
    /// Create a not found error.
    #[inline]
    pub fn not_found(resource: impl ToString) -> Self {
        Self::NotFound {
            message: resource.to_string(),
        }
    }

    /// Create a bad request error.
    #[inline]
    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest {
            message: message.to_string(),
        }
    }

    /// Create an unauthorized error.
    #[inline]
    pub fn unauthorized(message: impl ToString) -> Self {
        Self::Unauthorized {
            message: message.to_string(),
        }
    }

    /// Create a forbidden error.
    #[inline]
    pub fn forbidden(message: impl ToString) -> Self {
        Self::Forbidden {
            message: message.to_string(),
        }
    }

    /// Create a conflict error.
    #[inline]
    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict {
            message:  message.to_string(),
            existing: None,
        }
    }

    /// Create a conflict error pointing at the row that already exists.
    #[inline]
    pub fn conflict_with(message: impl ToString, field: &'static str, id: impl ToString) -> Self {
        Self::Conflict {
            message:  message.to_string(),
            existing: Some(ConflictRef {
                field,
                id: id.to_string(),
            }),
        }
    }

    /// Create a validation error for a single field.
    #[inline]
    pub fn invalid_field(field: impl ToString, message: impl ToString) -> Self {
        Self::Validation {
            message: "Validation failed".to_string(),
            details: vec![FieldError::new(field, message)],
        }
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(message: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Create a database error.
    #[inline]
    pub fn database(message: impl ToString) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    /// Create a config error.
    #[inline]
    pub fn config(message: impl ToString) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Create a migration error.
    #[inline]
    pub fn migration(message: impl ToString) -> Self {
        Self::Migration {
            message: message.to_string(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> http::StatusCode {
        match self {
            AppError::NotFound {
                ..
            } => http::StatusCode::NOT_FOUND,
            AppError::BadRequest {
                ..
            } |
            AppError::Validation {
                ..
            } => http::StatusCode::BAD_REQUEST,
            AppError::Unauthorized {
                ..
            } |
            AppError::JwtExpired |
            AppError::JwtInvalidToken => http::StatusCode::UNAUTHORIZED,
            AppError::Forbidden {
                ..
            } => http::StatusCode::FORBIDDEN,
            AppError::Conflict {
                ..
            } => http::StatusCode::CONFLICT,
            AppError::Internal {
                ..
            } |
            AppError::Database {
                ..
            } |
            AppError::Io {
                ..
            } |
            AppError::Config {
                ..
            } |
            AppError::Migration {
                ..
            } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound {
                ..
            } => "NOT_FOUND",
            AppError::BadRequest {
                ..
            } => "BAD_REQUEST",
            AppError::Unauthorized {
                ..
            } => "UNAUTHORIZED",
            AppError::JwtExpired => "JWT_EXPIRED",
            AppError::JwtInvalidToken => "JWT_INVALID_TOKEN",
            AppError::Forbidden {
                ..
            } => "FORBIDDEN",
            AppError::Conflict {
                ..
            } => "CONFLICT",
            AppError::Validation {
                ..
            } => "VALIDATION_ERROR",
            AppError::Internal {
                ..
            } => "INTERNAL_ERROR",
            AppError::Database {
                ..
            } => "DATABASE_ERROR",
            AppError::Io {
                ..
            } => "IO_ERROR",
            AppError::Config {
                ..
            } => "CONFIG_ERROR",
            AppError::Migration {
                ..
            } => "MIGRATION_ERROR",
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::JwtExpired => "Token expired".to_string(),
            AppError::JwtInvalidToken => "Invalid token".to_string(),
            AppError::NotFound {
                message,
            } |
            AppError::BadRequest {
                message,
            } |
            AppError::Unauthorized {
                message,
            } |
            AppError::Forbidden {
                message,
            } |
            AppError::Conflict {
                message,
                ..
            } |
            AppError::Validation {
                message,
                ..
            } |
            AppError::Internal {
                message,
            } |
            AppError::Database {
                message,
            } |
            AppError::Io {
                message,
            } |
            AppError::Config {
                message,
            } |
            AppError::Migration {
                message,
            } => message.clone(),
        }
    }

    /// Field-level validation details, if any.
    pub fn details(&self) -> Option<&[FieldError]> {
        match self {
            AppError::Validation {
                details,
                ..
            } if !details.is_empty() => Some(details),
            _ => None,
        }
    }

    /// Whether this error is a server-side failure.
    #[inline]
    pub fn is_server_error(&self) -> bool { self.status().is_server_error() }

    /// Add context to the error.
    ///
    /// JWT errors carry fixed messages and are returned unchanged.
    #[inline]
    pub fn context(self, context: impl ToString) -> Self {
        let prefix = |message: String| format!("{}: {}", context.to_string(), message);
        match self {
            AppError::JwtExpired | AppError::JwtInvalidToken => self,
            AppError::NotFound {
                message,
            } => {
                Self::NotFound {
                    message: prefix(message),
                }
            },
            AppError::BadRequest {
                message,
            } => {
                Self::BadRequest {
                    message: prefix(message),
                }
            },
            AppError::Unauthorized {
                message,
            } => {
                Self::Unauthorized {
                    message: prefix(message),
                }
            },
            AppError::Forbidden {
                message,
            } => {
                Self::Forbidden {
                    message: prefix(message),
                }
            },
            AppError::Conflict {
                message,
                existing,
            } => {
                Self::Conflict {
                    message: prefix(message),
                    existing,
                }
            },
            AppError::Validation {
                message,
                details,
            } => {
                Self::Validation {
                    message: prefix(message),
                    details,
                }
            },
            AppError::Internal {
                message,
            } => {
                Self::Internal {
                    message: prefix(message),
                }
            },
            AppError::Database {
                message,
            } => {
                Self::Database {
                    message: prefix(message),
                }
            },
            AppError::Io {
                message,
            } => {
                Self::Io {
                    message: prefix(message),
                }
            },
            AppError::Config {
                message,
            } => {
                Self::Config {
                    message: prefix(message),
                }
            },
            AppError::Migration {
                message,
            } => {
                Self::Migration {
                    message: prefix(message),
                }
            },
        }
    }
}

/// Convert anyhow errors to AppError.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Convert std::io errors to AppError.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Convert Sea-ORM database errors to AppError.
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }
}

/// Convert validator validation errors to AppError, keeping one detail entry per failed rule.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_field_errors(&err, &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));

        Self::Validation {
            message: "Validation failed".to_string(),
            details,
        }
    }
}

/// Flattens nested validation errors; nested structs are reported under their own
/// field names since request bodies are flat JSON objects.
fn collect_field_errors(errors: &validator::ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        match kind {
            validator::ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code));
                    FieldError::new(field.to_string(), message)
                }));
            },
            validator::ValidationErrorsKind::Struct(nested) => collect_field_errors(nested, out),
            validator::ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_field_errors(nested, out);
                }
            },
        }
    }
}
