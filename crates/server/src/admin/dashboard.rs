//! # Dashboards
//!
//! Read-only rollups for each role. Lead windows are counted by UTC capture day.

use std::collections::HashMap;

use axum::extract::{Extension, State};
use chrono::NaiveDate;
use entity::{
    companies,
    sea_orm_active_enums::{CompanyStatus, UserRole},
    users,
    visitor_leads,
    visitors,
};
use error::{ApiResponse, AppError, Result};
use sea_orm::{
    sea_query::Expr,
    ColumnTrait,
    Condition,
    DatabaseConnection,
    EntityTrait,
    FromQueryResult,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use super::companies::summarize_one;
use crate::{
    dto::dashboard::{
        CompanyCounts,
        CompanyDashboard,
        CompanyDashboardQuery,
        DailyCount,
        EmployeeDashboard,
        EmployeeStats,
        LeaderboardEntry,
        PlatformOverview,
        UserCounts,
        VisitorCounts,
    },
    extract::AppQuery,
    leads::query::{lead_counts, lead_stats, recent_rows, upcoming_follow_ups},
    middleware::auth::AuthenticatedUser,
    scope::AccessScope,
    utils::{day_start, days_ago},
    AppState,
};

/// Rows shown in the recent-lead and follow-up panels.
pub const PANEL_SIZE: u64 = 10;
/// Days covered by the activity chart, today included.
pub const ACTIVITY_DAYS: u64 = 7;

#[derive(Debug, FromQueryResult)]
struct DayCount {
    capture_date: NaiveDate,
    count:        i64,
}

#[derive(Debug, FromQueryResult)]
struct EmployeeCount {
    employee_id: Uuid,
    count:       i64,
}

async fn active_users(db: &DatabaseConnection, condition: Condition) -> Result<u64> {
    Ok(users::Entity::find()
        .filter(users::Column::IsActive.eq(true))
        .filter(condition)
        .count(db)
        .await?)
}

/// `GET /api/admin/dashboard/overview`
pub async fn platform_overview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiResponse<PlatformOverview>> {
    user.require_role(&[UserRole::PlatformAdmin])?;
    let db = &state.db;

    let companies = CompanyCounts {
        total:  companies::Entity::find().count(db).await?,
        active: companies::Entity::find()
            .filter(companies::Column::Status.eq(CompanyStatus::Active))
            .count(db)
            .await?,
    };

    let by_role = |role: UserRole| Condition::all().add(users::Column::Role.eq(role));
    let users = UserCounts {
        platform_admins: active_users(db, by_role(UserRole::PlatformAdmin)).await?,
        company_admins:  active_users(db, by_role(UserRole::CompanyAdmin)).await?,
        employees:       active_users(db, by_role(UserRole::Employee)).await?,
    };

    let visitors = VisitorCounts {
        total:        visitors::Entity::find().count(db).await?,
        last_30_days: visitors::Entity::find()
            .filter(visitors::Column::CreatedAt.gte(day_start(days_ago(30))))
            .count(db)
            .await?,
    };

    let leads = lead_counts(db, Condition::all()).await?;

    let recent_activity = visitor_leads::Entity::find()
        .select_only()
        .column(visitor_leads::Column::CaptureDate)
        .column_as(
            Expr::col((visitor_leads::Entity, visitor_leads::Column::Id)).count(),
            "count",
        )
        .filter(visitor_leads::Column::CaptureDate.gte(days_ago(ACTIVITY_DAYS - 1)))
        .group_by(visitor_leads::Column::CaptureDate)
        .order_by_desc(visitor_leads::Column::CaptureDate)
        .into_model::<DayCount>()
        .all(db)
        .await?
        .into_iter()
        .map(|row| {
            DailyCount {
                date:  row.capture_date,
                count: row.count.max(0) as u64,
            }
        })
        .collect();

    Ok(ApiResponse::ok(PlatformOverview {
        companies,
        users,
        visitors,
        leads,
        recent_activity,
    }))
}

async fn leads_per_employee(db: &DatabaseConnection, condition: Condition) -> Result<HashMap<Uuid, u64>> {
    Ok(visitor_leads::Entity::find()
        .select_only()
        .column(visitor_leads::Column::EmployeeId)
        .column_as(
            Expr::col((visitor_leads::Entity, visitor_leads::Column::Id)).count(),
            "count",
        )
        .filter(condition)
        .group_by(visitor_leads::Column::EmployeeId)
        .into_model::<EmployeeCount>()
        .all(db)
        .await?
        .into_iter()
        .map(|row| (row.employee_id, row.count.max(0) as u64))
        .collect())
}

/// Active employees ranked by lead count.
pub async fn leaderboard(db: &DatabaseConnection, company_id: Uuid) -> Result<Vec<LeaderboardEntry>> {
    let company_leads = Condition::all().add(visitor_leads::Column::CompanyId.eq(company_id));
    let totals = leads_per_employee(db, company_leads.clone()).await?;
    let recent = leads_per_employee(
        db,
        company_leads.add(visitor_leads::Column::CaptureDate.gte(days_ago(7))),
    )
    .await?;

    let employees = users::Entity::find()
        .filter(users::Column::CompanyId.eq(company_id))
        .filter(users::Column::Role.eq(UserRole::Employee))
        .filter(users::Column::IsActive.eq(true))
        .all(db)
        .await?;

    let mut board: Vec<LeaderboardEntry> = employees
        .into_iter()
        .map(|employee| {
            LeaderboardEntry {
                leads_count:       totals.get(&employee.id).copied().unwrap_or(0),
                leads_last_7_days: recent.get(&employee.id).copied().unwrap_or(0),
                employee_id:       employee.id,
                full_name:         employee.full_name,
                email:             employee.email,
            }
        })
        .collect();
    board.sort_by(|a, b| {
        b.leads_count
            .cmp(&a.leads_count)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });
    Ok(board)
}

/// `GET /api/admin/dashboard/company`
pub async fn company_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<CompanyDashboardQuery>,
) -> Result<ApiResponse<CompanyDashboard>> {
    user.require_role(&[UserRole::PlatformAdmin, UserRole::CompanyAdmin])?;
    let company_id = match AccessScope::for_user(&user, query.company_id)?.company_id() {
        Some(company_id) => company_id,
        None => return Err(AppError::bad_request("Company ID required for platform admin")),
    };

    let db = &state.db;
    let company = companies::Entity::find_by_id(company_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Company not found"))?;

    let scope = Condition::all().add(visitor_leads::Column::CompanyId.eq(company_id));
    let active_employees = active_users(
        db,
        Condition::all()
            .add(users::Column::CompanyId.eq(company_id))
            .add(users::Column::Role.eq(UserRole::Employee)),
    )
    .await?;

    Ok(ApiResponse::ok(CompanyDashboard {
        company: summarize_one(db, company).await?,
        active_employees,
        leads: lead_counts(db, scope.clone()).await?,
        leaderboard: leaderboard(db, company_id).await?,
        recent_leads: recent_rows(db, scope, PANEL_SIZE).await?,
    }))
}

/// `GET /api/admin/dashboard/employee`
pub async fn employee_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiResponse<EmployeeDashboard>> {
    user.require_role(&[UserRole::Employee])?;
    let scope = AccessScope::for_user(&user, None)?.lead_condition();
    let db = &state.db;

    let stats = lead_stats(db, scope.clone()).await?;
    Ok(ApiResponse::ok(EmployeeDashboard {
        stats: EmployeeStats {
            total_leads:        stats.total_leads,
            leads_last_30_days: stats.leads_last_30_days,
            leads_last_7_days:  stats.leads_last_7_days,
            leads_today:        stats.leads_today,
            pending_follow_ups: stats.pending_follow_ups,
        },
        recent_leads: recent_rows(db, scope.clone(), PANEL_SIZE).await?,
        upcoming_follow_ups: upcoming_follow_ups(db, scope, PANEL_SIZE).await?,
    }))
}
