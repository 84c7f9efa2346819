//! # JWT Token Management
//!
//! JWT token generation and validation for API authentication.

use std::{
    collections::HashSet,
    time::{Duration, SystemTime},
};

use base64::prelude::*;
use cuid2::CuidConstructor;
use error::{AppError, Result};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Seven days.
pub const DEFAULT_EXPIRATION_SECONDS: u64 = 7 * 24 * 60 * 60;
pub const DEFAULT_ISSUER: &str = "expo-leads";
pub const DEFAULT_AUDIENCE: &str = "expo-leads-api";

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Base64-encoded HMAC secret
    pub secret:             String,
    /// Token lifetime in seconds
    pub expiration_seconds: u64,
    /// Token issuer
    pub issuer:             String,
    /// Token audience
    pub audience:           String,
}

impl JwtConfig {
    /// Configuration with the given base64 secret and default lifetime, issuer and audience.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret:             secret.into(),
            expiration_seconds: DEFAULT_EXPIRATION_SECONDS,
            issuer:             DEFAULT_ISSUER.to_string(),
            audience:           DEFAULT_AUDIENCE.to_string(),
        }
    }

    /// Load from `EXPO_JWT_SECRET`, `EXPO_JWT_EXPIRATION_SECONDS`, `EXPO_JWT_ISSUER` and
    /// `EXPO_JWT_AUDIENCE`.
    ///
    /// # Errors
    ///
    /// Returns a config error when the secret is missing or not valid base64, or when the
    /// expiration is not a positive integer.
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("EXPO_JWT_SECRET")
            .map_err(|_| AppError::config("EXPO_JWT_SECRET must be set"))?;

        let expiration_seconds = match std::env::var("EXPO_JWT_EXPIRATION_SECONDS") {
            Ok(raw) => {
                raw.parse::<u64>()
                    .ok()
                    .filter(|v| *v > 0)
                    .ok_or_else(|| AppError::config(format!("Invalid EXPO_JWT_EXPIRATION_SECONDS: {}", raw)))?
            },
            Err(_) => DEFAULT_EXPIRATION_SECONDS,
        };

        let config = Self {
            secret,
            expiration_seconds,
            issuer: std::env::var("EXPO_JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
            audience: std::env::var("EXPO_JWT_AUDIENCE").unwrap_or_else(|_| DEFAULT_AUDIENCE.to_string()),
        };
        config.check_secret()?;
        Ok(config)
    }

    /// Ensure the secret decodes as base64 and is not empty.
    pub fn check_secret(&self) -> Result<()> {
        let decoded = BASE64_STANDARD
            .decode(self.secret.trim())
            .map_err(|e| AppError::config(format!("EXPO_JWT_SECRET is not valid base64: {}", e)))?;
        if decoded.is_empty() {
            return Err(AppError::config("EXPO_JWT_SECRET must not be empty"));
        }
        Ok(())
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// User ID
    pub user_id: String,

    /// User email
    pub email: String,

    /// Role at issue time
    pub role: String,

    /// Owning company, absent for platform admins
    pub company_id: Option<String>,

    /// Token issuer
    pub iss: String,

    /// Token audience
    pub aud: String,

    /// Expiration time (Unix timestamp)
    pub exp: u64,

    /// Issued at (Unix timestamp)
    pub iat: u64,

    /// Unique token ID
    pub jti: String,
}

/// Creates a new JWT access token
///
/// # Errors
///
/// Returns an internal error if the secret is unusable or encoding fails.
pub fn create_access_token(
    config: &JwtConfig,
    user_id: &str,
    email: &str,
    role: &str,
    company_id: Option<&str>,
) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| AppError::internal(format!("Failed to get current time: {}", e)))?;

    let expiration = now + Duration::from_secs(config.expiration_seconds);

    let claims = Claims {
        user_id:    user_id.to_string(),
        email:      email.to_string(),
        role:       role.to_string(),
        company_id: company_id.map(str::to_string),
        iss:        config.issuer.clone(),
        aud:        config.audience.clone(),
        exp:        expiration.as_secs(),
        iat:        now.as_secs(),
        jti:        CuidConstructor::new().with_length(32).create_id(),
    };

    let key = EncodingKey::from_base64_secret(&config.secret)
        .map_err(|e| AppError::internal(format!("Invalid JWT secret: {}", e)))?;

    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AppError::internal(format!("Failed to encode token: {}", e)))
}

/// Validates a JWT token and returns the claims
///
/// # Errors
///
/// `JwtExpired` for an expired token, `JwtInvalidToken` for anything else wrong with it.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims> {
    let decoding_key = DecodingKey::from_base64_secret(&config.secret)
        .map_err(|e| AppError::internal(format!("Invalid JWT secret: {}", e)))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.iss = Some(HashSet::from([config.issuer.clone()]));
    validation.aud = Some(HashSet::from([config.audience.clone()]));
    validation.validate_exp = true;
    validation.leeway = 0;

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::JwtExpired,
                _ => AppError::JwtInvalidToken,
            }
        })
}

/// Extracts the Bearer token from the Authorization header
///
/// Returns `None` for other schemes or an empty token.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let token = auth_header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
