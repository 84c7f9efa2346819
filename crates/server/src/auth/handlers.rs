//! # Authentication Handlers
//!
//! HTTP request handlers for authentication endpoints.

use ::auth::create_access_token;
use axum::{
    extract::{Extension, State},
    http::StatusCode,
};
use chrono::Utc;
use entity::{companies, sea_orm_active_enums::UserRole, users};
use error::{ApiResponse, AppError, Result};
use logging::log_auth_event;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter};
use tracing::info;
use validator::Validate;

use crate::{
    accounts::{check_password, create_account, existing_company, hash_new_password, NewAccount},
    dto::{
        auth::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterUserRequest, UpdateProfileRequest},
        users::{ProfileResponse, UserResponse},
        MessageResponse,
    },
    extract::AppJson,
    middleware::auth::{load_active_user, AuthenticatedUser},
    utils::{non_blank, normalize_email},
    AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Verify credentials of an active user and return it with its company.
pub async fn authenticate(
    state: &AppState,
    req: &LoginRequest,
) -> Result<(users::Model, Option<companies::Model>)> {
    let email = normalize_email(&req.email);
    let found = users::Entity::find()
        .filter(users::Column::Email.eq(&email))
        .filter(users::Column::IsActive.eq(true))
        .find_also_related(companies::Entity)
        .one(&state.db)
        .await?;

    let Some((user, company)) = found
    else {
        log_auth_event!("login", email, false);
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    };

    if let Err(err) = check_password(&req.password, &user.password_hash, INVALID_CREDENTIALS) {
        log_auth_event!("login", email, false);
        return Err(err);
    }

    Ok((user, company))
}

/// Sign a token for `user` and build the login body.
pub fn issue_token(state: &AppState, user: users::Model, company: Option<&companies::Model>) -> Result<LoginResponse> {
    let company_id = user.company_id.map(|id| id.to_string());
    let token = create_access_token(
        &state.jwt_config,
        &user.id.to_string(),
        &user.email,
        user.role.as_str(),
        company_id.as_deref(),
    )?;

    log_auth_event!("login", user.id, true);
    Ok(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.jwt_config.expiration_seconds,
        user: UserResponse::new(user, company),
    })
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>> {
    req.validate()?;
    let (user, company) = authenticate(&state, &req).await?;
    Ok(ApiResponse::ok(issue_token(&state, user, company.as_ref())?))
}

/// `POST /api/auth/register`
///
/// Platform admins create accounts of any role here.
pub async fn register(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    AppJson(req): AppJson<RegisterUserRequest>,
) -> Result<(StatusCode, ApiResponse<UserResponse>)> {
    actor.require_role(&[UserRole::PlatformAdmin])?;
    req.validate()?;

    let company = match (req.role, req.company_id) {
        (UserRole::PlatformAdmin, _) => None,
        (_, Some(company_id)) => Some(existing_company(&state.db, company_id).await?),
        (_, None) => {
            return Err(AppError::bad_request(
                "Company ID is required for company admins and employees",
            ))
        },
    };

    let user = create_account(
        &state.db,
        NewAccount {
            email:      req.email,
            password:   req.password,
            full_name:  req.full_name,
            phone:      req.phone,
            role:       req.role,
            company_id: company.as_ref().map(|c| c.id),
        },
    )
    .await?;

    log_auth_event!("register", user.id, true);
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(UserResponse::new(user, company.as_ref())),
    ))
}

/// `GET /api/auth/profile`
pub async fn get_profile(Extension(user): Extension<AuthenticatedUser>) -> Result<ApiResponse<ProfileResponse>> {
    Ok(ApiResponse::ok(ProfileResponse {
        user,
    }))
}

/// Apply a profile update and return the refreshed profile.
pub async fn save_profile(
    state: &AppState,
    user: &AuthenticatedUser,
    req: UpdateProfileRequest,
) -> Result<ProfileResponse> {
    req.validate()?;
    let mut active = users::Entity::find_by_id(user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?
        .into_active_model();

    if let Some(full_name) = req.full_name {
        active.full_name = Set(full_name.trim().to_string());
    }
    if let Some(phone) = req.phone {
        active.phone = Set(non_blank(Some(phone)));
    }
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;
    info!(user_id = %user.id, "Profile updated");

    let user = load_active_user(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(ProfileResponse {
        user,
    })
}

/// `PUT /api/auth/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> Result<ApiResponse<ProfileResponse>> {
    Ok(ApiResponse::ok(save_profile(&state, &user, req).await?))
}

/// `PUT /api/auth/change-password`
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> Result<ApiResponse<MessageResponse>> {
    req.validate()?;
    let stored = users::Entity::find_by_id(user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if let Err(err) = check_password(
        &req.current_password,
        &stored.password_hash,
        "Current password is incorrect",
    ) {
        log_auth_event!("change_password", user.id, false);
        return Err(err);
    }

    let mut active = stored.into_active_model();
    active.password_hash = Set(hash_new_password(&req.new_password)?);
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;

    log_auth_event!("change_password", user.id, true);
    Ok(ApiResponse::ok(MessageResponse::new(
        "Password changed successfully",
    )))
}
