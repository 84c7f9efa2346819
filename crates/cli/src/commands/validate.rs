//! # CLI Validate Command
//!
//! Configuration validation for the Expo Leads CLI.

use auth::JwtConfig;
use error::{AppError, Result};
use tracing::info;

use crate::config::DatabaseConfig;

/// Variables needed when `EXPO_DATABASE_URL` is not set.
const DATABASE_PARTS: [&str; 4] = [
    "EXPO_DATABASE_HOST",
    "EXPO_DATABASE_NAME",
    "EXPO_DATABASE_USER",
    "EXPO_DATABASE_PASSWORD",
];

/// Names from the required set that `lookup` cannot resolve.
pub fn missing_variables(lookup: impl Fn(&str) -> Option<String>) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if lookup("EXPO_JWT_SECRET").is_none() {
        missing.push("EXPO_JWT_SECRET");
    }
    if lookup("EXPO_DATABASE_URL").is_none() {
        missing.extend(
            DATABASE_PARTS
                .into_iter()
                .filter(|name| lookup(name).is_none()),
        );
    }
    missing
}

/// Validates the process environment
///
/// Checks that the required variables are present, that the database settings parse and
/// that the JWT secret decodes as base64.
pub fn validate() -> Result<()> {
    info!(target: "validate", "Validating configuration...");

    let missing = missing_variables(|name| std::env::var(name).ok());
    if !missing.is_empty() {
        return Err(AppError::config(format!(
            "Missing required environment variables: {}",
            missing.join(", ")
        )));
    }

    DatabaseConfig::from_env().map_err(|e| AppError::config(e.to_string()))?;
    JwtConfig::from_env()?;

    info!(target: "validate", "Configuration is valid");
    Ok(())
}
