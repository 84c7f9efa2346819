//! # Error Traits
//!
//! Attaching context to fallible results.

use crate::{AppError, Result};

/// Context for results whose error converts into [`AppError`].
pub trait ResultExt<T> {
    /// Convert the error into [`AppError`] and prefix its message.
    fn context<C: ToString>(self, context: C) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn context<C: ToString>(self, context: C) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            err.context(context)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context() {
        let result: Result<i32> = Err(AppError::not_found("Company"));
        let err = result.context("Loading dashboard").unwrap_err();
        assert_eq!(err.message(), "Loading dashboard: Company");
    }

    #[test]
    fn test_context_from_db_err() {
        let result: std::result::Result<(), sea_orm::DbErr> = Err(sea_orm::DbErr::Custom("gone".to_string()));
        let err = result.context("Counting leads").unwrap_err();
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert!(err.message().starts_with("Counting leads"));
    }
}
