//! # Authentication Primitives
//!
//! Credential handling for the Expo Leads service:
//! - JWT access token issuing and validation
//! - Argon2id password hashing and verification

pub mod jwt;
pub mod password;

// Re-export commonly used types
pub use jwt::{create_access_token, extract_bearer_token, validate_token, Claims, JwtConfig};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};
pub use secrecy;
