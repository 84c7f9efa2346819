//! # Account Management
//!
//! User creation and lookups shared by registration, admin and mobile endpoints.

use ::auth::{hash_password, secrecy::ExposeSecret, secrecy::SecretString, validate_password_strength, verify_password};
use chrono::Utc;
use entity::{companies, sea_orm_active_enums::UserRole, users};
use error::{AppError, FieldError, Result};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::info;
use uuid::Uuid;

use crate::utils::{is_unique_violation, non_blank, normalize_email};

pub const DUPLICATE_EMAIL_MESSAGE: &str = "User with this email already exists";

/// Everything needed to create a user
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email:      String,
    pub password:   String,
    pub full_name:  String,
    pub phone:      Option<String>,
    pub role:       UserRole,
    pub company_id: Option<Uuid>,
}

/// Hash a password after checking it is acceptable.
pub fn hash_new_password(password: &str) -> Result<String> {
    validate_password_strength(password).map_err(|errors| {
        AppError::Validation {
            message: "Validation failed".to_string(),
            details: errors
                .iter()
                .map(|e| FieldError::new("password", e))
                .collect(),
        }
    })?;

    let hash = hash_password(&SecretString::from(password.to_string()), None)?;
    Ok(hash.expose_secret().to_string())
}

/// Check a plaintext password against a stored hash.
///
/// A mismatch is reported as 401 with `message`.
pub fn check_password(password: &str, hash: &str, message: &str) -> Result<()> {
    verify_password(&SecretString::from(password.to_string()), hash).map_err(|err| {
        match AppError::from(err) {
            AppError::Unauthorized {
                ..
            } => AppError::unauthorized(message),
            other => other,
        }
    })
}

/// Fails with 409 when another user already owns `email`.
pub async fn ensure_email_available(db: &DatabaseConnection, email: &str, except: Option<Uuid>) -> Result<()> {
    let mut select = users::Entity::find().filter(users::Column::Email.eq(normalize_email(email)));
    if let Some(id) = except {
        select = select.filter(users::Column::Id.ne(id));
    }

    match select.one(db).await? {
        Some(_) => Err(AppError::conflict(DUPLICATE_EMAIL_MESSAGE)),
        None => Ok(()),
    }
}

/// Load a company a new account will be attached to; 400 when it does not exist.
pub async fn existing_company(db: &DatabaseConnection, company_id: Uuid) -> Result<companies::Model> {
    companies::Entity::find_by_id(company_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::bad_request("Company not found"))
}

/// Insert a user; a lost race on the email index is reported as 409.
pub async fn create_account(db: &DatabaseConnection, account: NewAccount) -> Result<users::Model> {
    let email = normalize_email(&account.email);
    ensure_email_available(db, &email, None).await?;
    let password_hash = hash_new_password(&account.password)?;

    let now = Utc::now();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(password_hash),
        full_name: Set(account.full_name.trim().to_string()),
        phone: Set(non_blank(account.phone)),
        role: Set(account.role),
        company_id: Set(account.company_id),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let user = user.insert(db).await.map_err(|err| {
        if is_unique_violation(&err) {
            AppError::conflict(DUPLICATE_EMAIL_MESSAGE)
        }
        else {
            err.into()
        }
    })?;

    info!(user_id = %user.id, role = %user.role, company_id = ?user.company_id, "User created");
    Ok(user)
}

/// Set `is_active = false` on a user.
pub async fn deactivate(db: &DatabaseConnection, user: users::Model) -> Result<users::Model> {
    let mut active: users::ActiveModel = user.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now());
    let user = active.update(db).await?;
    info!(user_id = %user.id, "User deactivated");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_is_validation_error() {
        let err = hash_new_password("123").unwrap_err();
        assert_eq!(err.status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_check_password_message() {
        let hash = hash_new_password("expo2026").unwrap();
        assert!(check_password("expo2026", &hash, "Invalid credentials").is_ok());

        let err = check_password("wrong-one", &hash, "Current password is incorrect").unwrap_err();
        assert_eq!(err.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Current password is incorrect");
    }
}
