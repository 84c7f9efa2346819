//! # Visitor Handlers

use axum::{
    extract::{Extension, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use entity::{sea_orm_active_enums::UserRole, visitor_leads, visitors};
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
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::reconcile::{find_by_phone, insert_visitor};
use crate::{
    dto::{
        visitors::{
            CreateVisitorRequest,
            UpdateVisitorRequest,
            VisitorListQuery,
            VisitorResponse,
            VisitorSearchResponse,
            VisitorStats,
        },
        MessageResponse,
    },
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthenticatedUser,
    utils::{contains_ci, day_start, days_ago, is_unique_violation, search_condition, today},
    AppState,
};

/// Shortest fragment accepted by the phone search.
pub const MIN_PHONE_SEARCH_LEN: usize = 3;
/// Results returned by the phone search.
pub const PHONE_SEARCH_LIMIT: u64 = 10;

async fn load_visitor(state: &AppState, id: Uuid) -> Result<visitors::Model> {
    visitors::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Visitor not found"))
}

/// `GET /api/visitors/search/{phone}`
pub async fn search_by_phone(
    State(state): State<AppState>,
    AppPath(phone): AppPath<String>,
) -> Result<ApiResponse<VisitorSearchResponse>> {
    let phone = phone.trim();
    if phone.chars().count() < MIN_PHONE_SEARCH_LEN {
        return Err(AppError::bad_request(
            "Phone number must be at least 3 characters",
        ));
    }

    let visitors = visitors::Entity::find()
        .filter(contains_ci(visitors::Column::Phone, phone))
        .order_by_desc(visitors::Column::CreatedAt)
        .paginate(&state.db, PHONE_SEARCH_LIMIT)
        .fetch_page(0)
        .await?;

    Ok(ApiResponse::ok(VisitorSearchResponse {
        count: visitors.len(),
        visitors,
    }))
}

/// `GET /api/visitors/{id}`
pub async fn get_visitor(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<VisitorResponse>> {
    Ok(ApiResponse::ok(load_visitor(&state, id).await?))
}

/// `POST /api/visitors`
///
/// Unlike lead capture this never reuses an existing row: a known phone is a conflict.
pub async fn create_visitor(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateVisitorRequest>,
) -> Result<(StatusCode, ApiResponse<VisitorResponse>)> {
    req.validate()?;
    let phone = req.phone.trim();
    let full_name = req
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::invalid_field("full_name", "Full name is required"))?;

    if let Some(existing) = find_by_phone(&state.db, phone).await? {
        return Err(visitor_exists(existing.id));
    }

    let visitor = match insert_visitor(&state.db, phone, full_name, &req.details).await {
        Ok(visitor) => visitor,
        Err(err) if is_unique_violation(&err) => {
            let existing = find_by_phone(&state.db, phone)
                .await?
                .ok_or_else(|| AppError::from(err))?;
            return Err(visitor_exists(existing.id));
        },
        Err(err) => return Err(err.into()),
    };

    info!(visitor_id = %visitor.id, "Visitor registered");
    Ok((StatusCode::CREATED, ApiResponse::ok(visitor)))
}

fn visitor_exists(id: Uuid) -> AppError {
    AppError::conflict_with(
        "Visitor with this phone number already exists",
        "visitor_id",
        id,
    )
}

/// `PUT /api/visitors/{id}`
pub async fn update_visitor(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateVisitorRequest>,
) -> Result<ApiResponse<VisitorResponse>> {
    req.validate()?;
    let mut visitor = load_visitor(&state, id).await?.into_active_model();

    if let Some(full_name) = req.full_name {
        visitor.full_name = Set(full_name.trim().to_string());
    }
    let details = req.details;
    if details.email.is_some() {
        visitor.email = Set(details.email);
    }
    if details.organization.is_some() {
        visitor.organization = Set(details.organization);
    }
    if details.designation.is_some() {
        visitor.designation = Set(details.designation);
    }
    if details.city.is_some() {
        visitor.city = Set(details.city);
    }
    if details.country.is_some() {
        visitor.country = Set(details.country);
    }
    if details.interests.is_some() {
        visitor.interests = Set(details.interests);
    }
    visitor.updated_at = Set(Utc::now());

    let visitor = visitor.update(&state.db).await?;
    info!(visitor_id = %visitor.id, "Visitor updated");
    Ok(ApiResponse::ok(visitor))
}

/// `GET /api/visitors`
pub async fn list_visitors(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<VisitorListQuery>,
) -> Result<ApiResponse<Vec<VisitorResponse>>> {
    user.require_role(&[UserRole::PlatformAdmin])?;

    let mut select = visitors::Entity::find().order_by_desc(visitors::Column::CreatedAt);
    if let Some(condition) = search_condition(
        query.search.as_deref(),
        [
            visitors::Column::FullName,
            visitors::Column::Phone,
            visitors::Column::Email,
            visitors::Column::Organization,
        ],
    ) {
        select = select.filter(condition);
    }

    let (page, limit) = (query.paging.page(), query.paging.limit());
    let paginator = select.paginate(&state.db, limit);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page - 1).await?;

    Ok(ApiResponse::paginated(
        rows,
        PaginationMeta::new(page, limit, total),
    ))
}

/// `GET /api/visitors/stats/overview`
pub async fn visitor_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiResponse<VisitorStats>> {
    user.require_role(&[UserRole::PlatformAdmin])?;

    let since = |date: NaiveDate| {
        visitors::Entity::find()
            .filter(visitors::Column::CreatedAt.gte(day_start(date)))
            .count(&state.db)
    };

    Ok(ApiResponse::ok(VisitorStats {
        total_visitors:        visitors::Entity::find().count(&state.db).await?,
        visitors_last_30_days: since(days_ago(30)).await?,
        visitors_last_7_days:  since(days_ago(7)).await?,
        visitors_today:        since(today()).await?,
    }))
}

/// `DELETE /api/visitors/{id}`
///
/// Hard delete; the visitor's leads go with it.
pub async fn delete_visitor(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<MessageResponse>> {
    user.require_role(&[UserRole::PlatformAdmin])?;
    let visitor = load_visitor(&state, id).await?;

    let txn = state.db.begin().await?;
    let leads = visitor_leads::Entity::delete_many()
        .filter(visitor_leads::Column::VisitorId.eq(visitor.id))
        .exec(&txn)
        .await?;
    visitors::Entity::delete_by_id(visitor.id)
        .exec(&txn)
        .await?;
    txn.commit().await?;

    info!(visitor_id = %visitor.id, leads_removed = leads.rows_affected, "Visitor deleted");
    Ok(ApiResponse::ok(MessageResponse::new(
        "Visitor deleted successfully",
    )))
}
