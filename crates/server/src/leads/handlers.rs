//! # Lead Handlers

use axum::{
    extract::{Extension, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use entity::{sea_orm_active_enums::UserRole, visitor_leads};
use error::{ApiResponse, AppError, PaginationMeta, Result};
use sea_orm::{EntityTrait, ModelTrait, PaginatorTrait};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{
    capture::{apply_update, capture_lead, resolve_company},
    export::render_csv,
    query::{filtered_rows, find_row, lead_stats as scoped_stats},
};
use crate::{
    dto::{
        leads::{CreateLeadRequest, CreatedLead, LeadListQuery, LeadRow, LeadStats, UpdateLeadRequest},
        MessageResponse,
    },
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthenticatedUser,
    scope::AccessScope,
    AppState,
};

/// `POST /api/leads`
pub async fn create_lead(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(req): AppJson<CreateLeadRequest>,
) -> Result<(StatusCode, ApiResponse<CreatedLead>)> {
    req.validate()?;
    let company_id = resolve_company(&state.db, &user, req.company_id).await?;
    let created = capture_lead(&state.db, user.id, company_id, req).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(created)))
}

/// `GET /api/leads`
pub async fn list_leads(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<LeadListQuery>,
) -> Result<ApiResponse<Vec<LeadRow>>> {
    let scope = AccessScope::for_user(&user, query.company_id)?;
    let (page, limit) = (query.paging.page(), query.paging.limit());

    let paginator = filtered_rows(&scope, &query)
        .into_model::<LeadRow>()
        .paginate(&state.db, limit);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page - 1).await?;

    Ok(ApiResponse::paginated(
        rows,
        PaginationMeta::new(page, limit, total),
    ))
}

/// `GET /api/leads/{id}`
pub async fn get_lead(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<LeadRow>> {
    let scope = AccessScope::for_user(&user, None)?;
    let row = find_row(&state.db, id, scope.lead_condition())
        .await?
        .ok_or_else(|| AppError::not_found("Lead not found or access denied"))?;
    Ok(ApiResponse::ok(row))
}

/// `PUT /api/leads/{id}`
pub async fn update_lead(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateLeadRequest>,
) -> Result<ApiResponse<visitor_leads::Model>> {
    let lead = visitor_leads::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Lead not found"))?;

    match user.role {
        UserRole::Employee if lead.employee_id != user.id => {
            logging::log_access_denied!(user.id, format!("update of lead {}", lead.id));
            return Err(AppError::forbidden("Can only update your own leads"));
        },
        UserRole::CompanyAdmin if Some(lead.company_id) != user.company_id => {
            logging::log_access_denied!(user.id, format!("update of lead {}", lead.id));
            return Err(AppError::forbidden("Access denied"));
        },
        _ => {},
    }

    Ok(ApiResponse::ok(apply_update(&state.db, lead, req).await?))
}

/// `DELETE /api/leads/{id}`
pub async fn delete_lead(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<MessageResponse>> {
    user.require_role(&[UserRole::PlatformAdmin, UserRole::CompanyAdmin])?;
    let scope = AccessScope::for_user(&user, None)?;

    let lead = visitor_leads::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .filter(|lead| scope.permits_lead(lead))
        .ok_or_else(|| AppError::not_found("Lead not found"))?;

    let lead_id = lead.id;
    lead.delete(&state.db).await?;
    info!(lead_id = %lead_id, deleted_by = %user.id, "Lead deleted");

    Ok(ApiResponse::ok(MessageResponse::new(
        "Lead deleted successfully",
    )))
}

/// `GET /api/leads/stats/overview`
pub async fn lead_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<LeadListQuery>,
) -> Result<ApiResponse<LeadStats>> {
    let scope = AccessScope::for_user(&user, query.company_id)?;
    let stats = scoped_stats(&state.db, scope.lead_condition_with(query.employee_id)).await?;
    Ok(ApiResponse::ok(stats))
}

/// `GET /api/leads/export/csv`
pub async fn export_leads(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<LeadListQuery>,
) -> Result<impl IntoResponse> {
    let scope = AccessScope::for_user(&user, query.company_id)?;
    let rows = filtered_rows(&scope, &query)
        .into_model::<LeadRow>()
        .all(&state.db)
        .await?;
    let body = render_csv(&rows)?;

    info!(rows = rows.len(), user_id = %user.id, "Leads exported");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"leads.csv\"",
            ),
        ],
        body,
    ))
}
