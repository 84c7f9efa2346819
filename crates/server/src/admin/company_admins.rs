//! # Company Admin Management

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
        users::{CreateCompanyAdminRequest, UpdateCompanyAdminRequest, UserListQuery, UserResponse},
        MessageResponse,
    },
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthenticatedUser,
    utils::{non_blank, normalize_email, search_condition},
    AppState,
};

async fn find_company_admin(state: &AppState, id: Uuid) -> Result<users::Model> {
    users::Entity::find_by_id(id)
        .filter(users::Column::Role.eq(UserRole::CompanyAdmin))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Company admin not found"))
}

/// `GET /api/admin/company-admins`
///
/// Includes deactivated admins so they can be re-enabled.
pub async fn list_company_admins(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<UserListQuery>,
) -> Result<ApiResponse<Vec<UserResponse>>> {
    user.require_role(&[UserRole::PlatformAdmin])?;

    let mut select = users::Entity::find()
        .filter(users::Column::Role.eq(UserRole::CompanyAdmin))
        .order_by_desc(users::Column::CreatedAt);
    if let Some(company_id) = query.company_id {
        select = select.filter(users::Column::CompanyId.eq(company_id));
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
        .map(|(admin, company)| UserResponse::new(admin, company.as_ref()))
        .collect();

    Ok(ApiResponse::paginated(
        rows,
        PaginationMeta::new(page, limit, total),
    ))
}

/// `POST /api/admin/company-admins`
pub async fn create_company_admin(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(req): AppJson<CreateCompanyAdminRequest>,
) -> Result<(StatusCode, ApiResponse<UserResponse>)> {
    user.require_role(&[UserRole::PlatformAdmin])?;
    req.validate()?;
    let company = existing_company(&state.db, req.company_id).await?;

    let admin = create_account(
        &state.db,
        NewAccount {
            email:      req.email,
            password:   req.password,
            full_name:  req.full_name,
            phone:      req.phone,
            role:       UserRole::CompanyAdmin,
            company_id: Some(company.id),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(UserResponse::new(admin, Some(&company))),
    ))
}

/// `PUT /api/admin/company-admins/{id}`
pub async fn update_company_admin(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateCompanyAdminRequest>,
) -> Result<ApiResponse<UserResponse>> {
    user.require_role(&[UserRole::PlatformAdmin])?;
    req.validate()?;
    let admin = find_company_admin(&state, id).await?;

    if let Some(email) = req.email.as_deref() {
        ensure_email_available(&state.db, email, Some(admin.id)).await?;
    }
    let company = match req.company_id.or(admin.company_id) {
        Some(company_id) => Some(existing_company(&state.db, company_id).await?),
        None => None,
    };

    let mut active = admin.into_active_model();
    if let Some(full_name) = req.full_name {
        active.full_name = Set(full_name.trim().to_string());
    }
    if let Some(email) = req.email {
        active.email = Set(normalize_email(&email));
    }
    if let Some(phone) = req.phone {
        active.phone = Set(non_blank(Some(phone)));
    }
    if let Some(is_active) = req.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(company_id) = req.company_id {
        active.company_id = Set(Some(company_id));
    }
    active.updated_at = Set(Utc::now());

    let admin = active.update(&state.db).await?;
    info!(user_id = %admin.id, is_active = admin.is_active, "Company admin updated");
    Ok(ApiResponse::ok(UserResponse::new(admin, company.as_ref())))
}

/// `DELETE /api/admin/company-admins/{id}`
pub async fn remove_company_admin(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<MessageResponse>> {
    user.require_role(&[UserRole::PlatformAdmin])?;
    let admin = find_company_admin(&state, id).await?;
    deactivate(&state.db, admin).await?;
    Ok(ApiResponse::ok(MessageResponse::new(
        "Company admin removed successfully",
    )))
}
