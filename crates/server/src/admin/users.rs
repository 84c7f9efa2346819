//! # User Management
//!
//! Platform admins manage every account; company admins manage the employees of their own
//! company.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
};
use chrono::Utc;
use entity::{companies, sea_orm_active_enums::UserRole, users};
use error::{ApiResponse, AppError, PaginationMeta, Result};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::Set,
    ColumnTrait,
    EntityTrait,
    IntoActiveModel,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    accounts::{create_account, deactivate, ensure_email_available, existing_company, NewAccount},
    dto::{
        users::{CreateUserRequest, UpdateUserRequest, UserListQuery, UserResponse},
        MessageResponse,
    },
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthenticatedUser,
    scope::AccessScope,
    utils::{non_blank, normalize_email, search_condition},
    AppState,
};

async fn find_user(state: &AppState, id: Uuid) -> Result<users::Model> {
    users::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// `GET /api/admin/users`
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<UserListQuery>,
) -> Result<ApiResponse<Vec<UserResponse>>> {
    user.require_role(&[UserRole::PlatformAdmin, UserRole::CompanyAdmin])?;
    let scope = AccessScope::for_user(&user, query.company_id)?;

    let mut select = users::Entity::find()
        .filter(scope.user_condition())
        .filter(users::Column::IsActive.eq(true))
        .order_by_desc(users::Column::CreatedAt);
    if let Some(role) = query.role {
        select = select.filter(users::Column::Role.eq(role));
    }
    if let Some(condition) = search_condition(
        query.search.as_deref(),
        [users::Column::Email, users::Column::FullName],
    ) {
        select = select.filter(condition);
    }

    let (page, limit) = (query.paging.page(), query.paging.limit());
    let paginator = select
        .find_also_related(companies::Entity)
        .paginate(&state.db, limit);
    let total = paginator.num_items().await?;
    let rows = paginator
        .fetch_page(page - 1)
        .await?
        .into_iter()
        .map(|(user, company)| UserResponse::new(user, company.as_ref()))
        .collect();

    Ok(ApiResponse::paginated(
        rows,
        PaginationMeta::new(page, limit, total),
    ))
}

/// `POST /api/admin/users`
pub async fn create_user(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    AppJson(req): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, ApiResponse<UserResponse>)> {
    actor.require_role(&[UserRole::PlatformAdmin, UserRole::CompanyAdmin])?;
    req.validate()?;

    let company = if actor.is(UserRole::CompanyAdmin) {
        if req.role != UserRole::Employee {
            logging::log_access_denied!(actor.id, format!("create user with role {}", req.role));
            return Err(AppError::forbidden("Company admins can only create employees"));
        }
        Some(existing_company(&state.db, actor.require_company()?).await?)
    }
    else {
        match (req.role, req.company_id) {
            (UserRole::PlatformAdmin, _) => None,
            (_, Some(company_id)) => Some(existing_company(&state.db, company_id).await?),
            (_, None) => {
                return Err(AppError::bad_request(
                    "Company ID is required for company admins and employees",
                ))
            },
        }
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

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(UserResponse::new(user, company.as_ref())),
    ))
}

/// `PUT /api/admin/users/{id}`
pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateUserRequest>,
) -> Result<ApiResponse<UserResponse>> {
    actor.require_role(&[UserRole::PlatformAdmin, UserRole::CompanyAdmin])?;
    req.validate()?;
    let target = find_user(&state, id).await?;

    if actor.is(UserRole::CompanyAdmin) {
        let own = actor.require_company()?;
        let denied = if target.company_id != Some(own) {
            Some("Access denied")
        }
        else if req.role.is_some_and(|role| role != UserRole::Employee) {
            Some("Company admins can only assign the employee role")
        }
        else if req.company_id.is_some_and(|company| company != own) {
            Some("Cannot move users to another company")
        }
        else {
            None
        };
        if let Some(message) = denied {
            logging::log_access_denied!(actor.id, format!("update of user {}", target.id));
            return Err(AppError::forbidden(message));
        }
    }
    else {
        let role = req.role.unwrap_or(target.role);
        if role.requires_company() && req.company_id.or(target.company_id).is_none() {
            return Err(AppError::bad_request(
                "Company ID is required for company admins and employees",
            ));
        }
        if let Some(company_id) = req.company_id {
            existing_company(&state.db, company_id).await?;
        }
    }

    if let Some(email) = req.email.as_deref() {
        ensure_email_available(&state.db, email, Some(target.id)).await?;
    }

    let mut active = target.into_active_model();
    if let Some(full_name) = req.full_name {
        active.full_name = Set(full_name.trim().to_string());
    }
    if let Some(email) = req.email {
        active.email = Set(normalize_email(&email));
    }
    if let Some(phone) = req.phone {
        active.phone = Set(non_blank(Some(phone)));
    }
    if let Some(role) = req.role {
        active.role = Set(role);
    }
    if let Some(company_id) = req.company_id {
        active.company_id = Set(Some(company_id));
    }
    active.updated_at = Set(Utc::now());

    let user = active.update(&state.db).await?;
    info!(user_id = %user.id, updated_by = %actor.id, "User updated");

    let company = match user.company_id {
        Some(company_id) => companies::Entity::find_by_id(company_id).one(&state.db).await?,
        None => None,
    };
    Ok(ApiResponse::ok(UserResponse::new(user, company.as_ref())))
}

/// `PUT /api/admin/users/{id}/deactivate`
pub async fn deactivate_user(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<UserResponse>> {
    actor.require_role(&[UserRole::PlatformAdmin])?;
    if id == actor.id {
        return Err(AppError::bad_request("Cannot deactivate your own account"));
    }

    let user = deactivate(&state.db, find_user(&state, id).await?).await?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}

/// `DELETE /api/admin/employees/{id}`
///
/// Soft delete of an employee in the caller's company.
pub async fn remove_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<MessageResponse>> {
    actor.require_role(&[UserRole::CompanyAdmin])?;
    let company_id = actor.require_company()?;

    let employee = users::Entity::find_by_id(id)
        .filter(users::Column::CompanyId.eq(company_id))
        .filter(users::Column::Role.eq(UserRole::Employee))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

    deactivate(&state.db, employee).await?;
    Ok(ApiResponse::ok(MessageResponse::new(
        "Employee removed successfully",
    )))
}
