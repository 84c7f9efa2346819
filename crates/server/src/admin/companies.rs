//! # Company Management

use std::collections::HashMap;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
};
use chrono::Utc;
use entity::{
    companies,
    sea_orm_active_enums::{CompanyStatus, UserRole},
    users,
    visitor_leads,
};
use error::{ApiResponse, AppError, PaginationMeta, Result};
use sea_orm::{
    sea_query::Expr,
    ActiveModelTrait,
    ActiveValue::Set,
    ColumnTrait,
    DatabaseConnection,
    EntityTrait,
    FromQueryResult,
    IntoActiveModel,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::companies::{CompanyListQuery, CompanySummary, CreateCompanyRequest, UpdateCompanyRequest},
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthenticatedUser,
    utils::{generate_company_code, is_unique_violation, non_blank, search_condition},
    AppState,
};

const DUPLICATE_CODE_MESSAGE: &str = "Company code already exists";

#[derive(Debug, FromQueryResult)]
struct RoleCount {
    company_id: Uuid,
    role:       UserRole,
    count:      i64,
}

#[derive(Debug, FromQueryResult)]
struct LeadCount {
    company_id: Uuid,
    count:      i64,
}

/// Attach active headcounts and lead totals to each company.
pub async fn summarize(db: &DatabaseConnection, rows: Vec<companies::Model>) -> Result<Vec<CompanySummary>> {
    let ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let role_counts = users::Entity::find()
        .select_only()
        .column(users::Column::CompanyId)
        .column(users::Column::Role)
        .column_as(Expr::col((users::Entity, users::Column::Id)).count(), "count")
        .filter(users::Column::CompanyId.is_in(ids.clone()))
        .filter(users::Column::IsActive.eq(true))
        .group_by(users::Column::CompanyId)
        .group_by(users::Column::Role)
        .into_model::<RoleCount>()
        .all(db)
        .await?;

    let lead_counts: HashMap<Uuid, u64> = visitor_leads::Entity::find()
        .select_only()
        .column(visitor_leads::Column::CompanyId)
        .column_as(
            Expr::col((visitor_leads::Entity, visitor_leads::Column::Id)).count(),
            "count",
        )
        .filter(visitor_leads::Column::CompanyId.is_in(ids))
        .group_by(visitor_leads::Column::CompanyId)
        .into_model::<LeadCount>()
        .all(db)
        .await?
        .into_iter()
        .map(|row| (row.company_id, row.count.max(0) as u64))
        .collect();

    Ok(rows
        .into_iter()
        .map(|company| {
            let mut summary = CompanySummary::new(company);
            for row in role_counts.iter().filter(|r| r.company_id == summary.id) {
                let count = row.count.max(0) as u64;
                summary.total_users += count;
                match row.role {
                    UserRole::CompanyAdmin => summary.company_admins += count,
                    UserRole::Employee => summary.employees += count,
                    UserRole::PlatformAdmin => {},
                }
            }
            summary.total_leads = lead_counts.get(&summary.id).copied().unwrap_or(0);
            summary
        })
        .collect())
}

/// Summary of one company.
pub async fn summarize_one(db: &DatabaseConnection, company: companies::Model) -> Result<CompanySummary> {
    summarize(db, vec![company])
        .await?
        .pop()
        .ok_or_else(|| AppError::internal("Company summary missing"))
}

/// `GET /api/admin/companies`
pub async fn list_companies(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<CompanyListQuery>,
) -> Result<ApiResponse<Vec<CompanySummary>>> {
    user.require_role(&[UserRole::PlatformAdmin])?;

    let mut select = companies::Entity::find().order_by_desc(companies::Column::CreatedAt);
    if let Some(condition) = search_condition(
        query.search.as_deref(),
        [companies::Column::Name, companies::Column::CompanyCode],
    ) {
        select = select.filter(condition);
    }
    if let Some(status) = query.status {
        select = select.filter(companies::Column::Status.eq(status));
    }

    let (page, limit) = (query.paging.page(), query.paging.limit());
    let paginator = select.paginate(&state.db, limit);
    let total = paginator.num_items().await?;
    let rows = summarize(&state.db, paginator.fetch_page(page - 1).await?).await?;

    Ok(ApiResponse::paginated(
        rows,
        PaginationMeta::new(page, limit, total),
    ))
}

/// `POST /api/admin/companies`
pub async fn create_company(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(req): AppJson<CreateCompanyRequest>,
) -> Result<(StatusCode, ApiResponse<CompanySummary>)> {
    user.require_role(&[UserRole::PlatformAdmin])?;
    req.validate()?;

    let company_code = non_blank(req.company_code).unwrap_or_else(generate_company_code);
    let taken = companies::Entity::find()
        .filter(companies::Column::CompanyCode.eq(&company_code))
        .one(&state.db)
        .await?;
    if taken.is_some() {
        return Err(AppError::conflict(DUPLICATE_CODE_MESSAGE));
    }

    let now = Utc::now();
    let company = companies::ActiveModel {
        id:            Set(Uuid::new_v4()),
        name:          Set(req.name.trim().to_string()),
        company_code:  Set(company_code),
        contact_email: Set(non_blank(req.contact_email)),
        contact_phone: Set(non_blank(req.contact_phone)),
        status:        Set(CompanyStatus::Active),
        created_at:    Set(now),
        updated_at:    Set(now),
    }
    .insert(&state.db)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::conflict(DUPLICATE_CODE_MESSAGE)
        }
        else {
            err.into()
        }
    })?;

    info!(company_id = %company.id, company_code = %company.company_code, "Company created");
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(CompanySummary::new(company)),
    ))
}

/// `PUT /api/admin/companies/{id}`
pub async fn update_company(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateCompanyRequest>,
) -> Result<ApiResponse<CompanySummary>> {
    user.require_role(&[UserRole::PlatformAdmin])?;
    req.validate()?;

    let mut company = companies::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Company not found"))?
        .into_active_model();

    if let Some(name) = req.name {
        company.name = Set(name.trim().to_string());
    }
    if let Some(email) = req.contact_email {
        company.contact_email = Set(non_blank(email));
    }
    if let Some(phone) = req.contact_phone {
        company.contact_phone = Set(non_blank(phone));
    }
    if let Some(status) = req.status {
        company.status = Set(status);
    }
    company.updated_at = Set(Utc::now());

    let company = company.update(&state.db).await?;
    info!(company_id = %company.id, status = %company.status, "Company updated");
    Ok(ApiResponse::ok(summarize_one(&state.db, company).await?))
}
