//! # Authentication Middleware
//!
//! JWT authentication middleware for protecting API endpoints.
//!
//! The token only identifies the user; role and company are re-read from the database on
//! every request so deactivation takes effect immediately.

use ::auth::{extract_bearer_token, validate_token};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use entity::{
    companies,
    sea_orm_active_enums::{CompanyStatus, UserRole},
    users,
};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use uuid::Uuid;

use super::request_id::RequestSpan;
use crate::AppState;

/// The acting user, loaded from the database for the current request
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub id:             Uuid,
    pub email:          String,
    pub full_name:      String,
    pub phone:          Option<String>,
    pub role:           UserRole,
    pub company_id:     Option<Uuid>,
    pub company_name:   Option<String>,
    pub company_code:   Option<String>,
    #[serde(skip)]
    pub company_status: Option<CompanyStatus>,
    pub is_active:      bool,
}

impl AuthenticatedUser {
    pub fn from_models(user: users::Model, company: Option<companies::Model>) -> Self {
        Self {
            id:             user.id,
            email:          user.email,
            full_name:      user.full_name,
            phone:          user.phone,
            role:           user.role,
            company_id:     user.company_id,
            company_name:   company.as_ref().map(|c| c.name.clone()),
            company_code:   company.as_ref().map(|c| c.company_code.clone()),
            company_status: company.map(|c| c.status),
            is_active:      user.is_active,
        }
    }

    pub fn is(&self, role: UserRole) -> bool { self.role == role }

    /// Fails with 403 unless the user holds one of `roles`.
    pub fn require_role(&self, roles: &[UserRole]) -> Result<()> {
        if roles.contains(&self.role) {
            Ok(())
        }
        else {
            logging::log_access_denied!(self.id, format!("role {} not in {:?}", self.role, roles));
            Err(AppError::forbidden("Insufficient permissions"))
        }
    }

    /// The user's company; 403 when the account has none.
    pub fn require_company(&self) -> Result<Uuid> {
        self.company_id
            .ok_or_else(|| AppError::forbidden("User is not assigned to a company"))
    }
}

/// Loads an active user together with their company.
pub async fn load_active_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<AuthenticatedUser>> {
    let found = users::Entity::find_by_id(user_id)
        .filter(users::Column::IsActive.eq(true))
        .find_also_related(companies::Entity)
        .one(db)
        .await?;

    Ok(found.map(|(user, company)| AuthenticatedUser::from_models(user, company)))
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the JWT token
/// 3. Loads the active user and their company
/// 4. Adds the [`AuthenticatedUser`] to request extensions
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
        .map(str::to_owned)
        .ok_or_else(|| AppError::unauthorized("Access token required"))?;

    let claims = validate_token(&state.jwt_config, &token)?;
    let user_id = Uuid::parse_str(&claims.user_id).map_err(|_| AppError::JwtInvalidToken)?;

    let user = load_active_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid token or user not found"))?;

    if let Some(span) = request.extensions().get::<RequestSpan>() {
        span.record_user(user.id);
    }
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Restricts a route group to employees attached to a company.
pub async fn mobile_guard(request: Request, next: Next) -> Result<Response> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::unauthorized("Access token required"))?;

    if !user.is(UserRole::Employee) || user.company_id.is_none() {
        logging::log_access_denied!(user.id, "mobile route outside employee role");
        return Err(AppError::forbidden("Mobile access restricted to employees only"));
    }

    Ok(next.run(request).await)
}
