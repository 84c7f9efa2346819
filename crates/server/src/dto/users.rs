//! # User Data Transfer Objects
//!
//! Request and response types for user management endpoints.

use chrono::{DateTime, Utc};
use entity::{companies, sea_orm_active_enums::UserRole, users};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{blank_as_none, query_opt, PageParams};
use crate::middleware::auth::AuthenticatedUser;

/// User as returned by the API; never carries the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id:           Uuid,
    pub email:        String,
    pub full_name:    String,
    pub phone:        Option<String>,
    pub role:         UserRole,
    pub company_id:   Option<Uuid>,
    pub company_name: Option<String>,
    pub company_code: Option<String>,
    pub is_active:    bool,
    pub created_at:   DateTime<Utc>,
    pub updated_at:   DateTime<Utc>,
}

impl UserResponse {
    pub fn new(user: users::Model, company: Option<&companies::Model>) -> Self {
        Self {
            id:           user.id,
            email:        user.email,
            full_name:    user.full_name,
            phone:        user.phone,
            role:         user.role,
            company_id:   user.company_id,
            company_name: company.map(|c| c.name.clone()),
            company_code: company.map(|c| c.company_code.clone()),
            is_active:    user.is_active,
            created_at:   user.created_at,
            updated_at:   user.updated_at,
        }
    }
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self { Self::new(user, None) }
}

/// Profile of the acting user
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user: AuthenticatedUser,
}

/// Query parameters for user list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    #[serde(flatten)]
    pub paging:     PageParams,
    /// Filter by role
    #[serde(default, deserialize_with = "query_opt")]
    pub role:       Option<UserRole>,
    /// Search term for email/full_name
    pub search:     Option<String>,
    /// Company filter, platform admins only
    #[serde(default, deserialize_with = "query_opt")]
    pub company_id: Option<Uuid>,
}

/// Request body for creating a user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateUserRequest {
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

    #[serde(default, deserialize_with = "blank_as_none")]
    pub company_id: Option<Uuid>,
}

/// Request body for updating a user; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 200, message = "Full name must be between 2 and 200 characters"))]
    pub full_name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub role: Option<UserRole>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub company_id: Option<Uuid>,
}

/// Request body for creating a company admin
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateCompanyAdminRequest {
    #[validate(length(min = 2, max = 200, message = "Full name must be between 2 and 200 characters"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,

    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    pub password: String,

    pub company_id: Uuid,
}

/// Request body for updating a company admin
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateCompanyAdminRequest {
    #[validate(length(min = 2, max = 200, message = "Full name must be between 2 and 200 characters"))]
    pub full_name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,

    pub is_active: Option<bool>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub company_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_hides_password_hash() {
        let now = Utc::now();
        let response = UserResponse::from(users::Model {
            id:            Uuid::new_v4(),
            email:         "a@b.co".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            full_name:     "A B".to_string(),
            phone:         None,
            role:          UserRole::Employee,
            company_id:    None,
            is_active:     true,
            created_at:    now,
            updated_at:    now,
        });
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"role\":\"employee\""));
    }

    #[test]
    fn test_update_user_ignores_blank_role() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"role":"","company_id":""}"#).unwrap();
        assert!(req.role.is_none());
        assert!(req.company_id.is_none());
    }
}
