//! # Authentication Data Transfer Objects
//!
//! Request and response types for authentication endpoints.

use entity::sea_orm_active_enums::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{blank_as_none, users::UserResponse};

/// Request body for user login
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// User's password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for registering an account of any role
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 256, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 200, message = "Full name must be between 2 and 200 characters"))]
    pub full_name: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
    pub phone: Option<String>,

    pub role: UserRole,

    /// Required unless the role is platform_admin
    #[serde(default, deserialize_with = "blank_as_none")]
    pub company_id: Option<Uuid>,
}

/// Request body for updating one's own profile
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 200, message = "Full name must be between 2 and 200 characters"))]
    pub full_name: Option<String>,

    #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
    pub phone: Option<String>,
}

/// Request body for changing one's own password
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 6, max = 256, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

/// Successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// JWT access token for API requests
    pub token:      String,
    /// Token type (always "Bearer")
    pub token_type: &'static str,
    /// Token lifetime in seconds
    pub expires_in: u64,
    pub user:       UserResponse,
}
