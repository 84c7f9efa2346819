//! # Lead Queries
//!
//! Joined lead rows and the counts built on top of the access scope.

use chrono::NaiveDate;
use entity::{companies, users, visitor_leads, visitors};
use error::Result;
use sea_orm::{
    ColumnTrait,
    Condition,
    DatabaseConnection,
    EntityTrait,
    JoinType,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    RelationTrait,
    Select,
};
use uuid::Uuid;

use crate::{
    dto::{
        dashboard::LeadCounts,
        leads::{LeadListQuery, LeadRow, LeadStats},
    },
    scope::AccessScope,
    utils::{contains_ci, days_ago, today},
};

/// Leads joined with their visitor, employee and company.
fn joined_rows() -> Select<visitor_leads::Entity> {
    visitor_leads::Entity::find()
        .join(JoinType::InnerJoin, visitor_leads::Relation::Visitor.def())
        .join(JoinType::InnerJoin, visitor_leads::Relation::Employee.def())
        .join(JoinType::InnerJoin, visitor_leads::Relation::Company.def())
        .column_as(visitors::Column::Phone, "visitor_phone")
        .column_as(visitors::Column::FullName, "visitor_name")
        .column_as(visitors::Column::Email, "visitor_email")
        .column_as(users::Column::FullName, "employee_name")
        .column_as(users::Column::Email, "employee_email")
        .column_as(companies::Column::Name, "company_name")
}

/// Joined lead rows, newest first.
pub fn lead_rows() -> Select<visitor_leads::Entity> { joined_rows().order_by_desc(visitor_leads::Column::CreatedAt) }

/// Scope, employee and capture-day filters. Only touches `visitor_leads` columns.
pub fn list_condition(scope: &AccessScope, query: &LeadListQuery) -> Condition {
    let mut condition = scope.lead_condition_with(query.employee_id);
    if let Some(from) = query.date_from {
        condition = condition.add(visitor_leads::Column::CaptureDate.gte(from));
    }
    if let Some(to) = query.date_to {
        condition = condition.add(visitor_leads::Column::CaptureDate.lte(to));
    }
    condition
}

/// Case-insensitive match over the visitor's name, phone and email.
pub fn visitor_search(term: Option<&str>) -> Option<Condition> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    Some(
        Condition::any()
            .add(contains_ci(visitors::Column::FullName, term))
            .add(contains_ci(visitors::Column::Phone, term))
            .add(contains_ci(visitors::Column::Email, term)),
    )
}

/// The filtered, joined select behind both the list and the CSV export.
pub fn filtered_rows(scope: &AccessScope, query: &LeadListQuery) -> Select<visitor_leads::Entity> {
    let mut select = lead_rows().filter(list_condition(scope, query));
    if let Some(search) = visitor_search(query.search.as_deref()) {
        select = select.filter(search);
    }
    select
}

/// A single joined row, if it matches `condition`.
pub async fn find_row(db: &DatabaseConnection, id: Uuid, condition: Condition) -> Result<Option<LeadRow>> {
    Ok(lead_rows()
        .filter(visitor_leads::Column::Id.eq(id))
        .filter(condition)
        .into_model::<LeadRow>()
        .one(db)
        .await?)
}

/// The `limit` newest rows matching `condition`.
pub async fn recent_rows(db: &DatabaseConnection, condition: Condition, limit: u64) -> Result<Vec<LeadRow>> {
    Ok(lead_rows()
        .filter(condition)
        .limit(limit)
        .into_model::<LeadRow>()
        .all(db)
        .await?)
}

/// Pending follow-ups matching `condition`, nearest first.
pub async fn upcoming_follow_ups(db: &DatabaseConnection, condition: Condition, limit: u64) -> Result<Vec<LeadRow>> {
    Ok(joined_rows()
        .filter(condition)
        .filter(visitor_leads::Column::FollowUpDate.gte(today()))
        .order_by_asc(visitor_leads::Column::FollowUpDate)
        .limit(limit)
        .into_model::<LeadRow>()
        .all(db)
        .await?)
}

/// Number of leads matching `condition`.
pub async fn count_leads(db: &DatabaseConnection, condition: Condition) -> Result<u64> {
    Ok(visitor_leads::Entity::find()
        .filter(condition)
        .count(db)
        .await?)
}

async fn count_since(db: &DatabaseConnection, base: &Condition, since: NaiveDate) -> Result<u64> {
    count_leads(
        db,
        base.clone()
            .add(visitor_leads::Column::CaptureDate.gte(since)),
    )
    .await
}

/// Total, 30 day, 7 day and today's counts.
pub async fn lead_counts(db: &DatabaseConnection, base: Condition) -> Result<LeadCounts> {
    Ok(LeadCounts {
        total:        count_leads(db, base.clone()).await?,
        last_30_days: count_since(db, &base, days_ago(30)).await?,
        last_7_days:  count_since(db, &base, days_ago(7)).await?,
        today:        count_since(db, &base, today()).await?,
    })
}

/// Lead counts including follow-up totals.
pub async fn lead_stats(db: &DatabaseConnection, base: Condition) -> Result<LeadStats> {
    let counts = lead_counts(db, base.clone()).await?;
    Ok(LeadStats {
        total_leads:          counts.total,
        leads_last_30_days:   counts.last_30_days,
        leads_last_7_days:    counts.last_7_days,
        leads_today:          counts.today,
        leads_with_follow_up: count_leads(
            db,
            base.clone()
                .add(visitor_leads::Column::FollowUpDate.is_not_null()),
        )
        .await?,
        pending_follow_ups:   count_leads(
            db,
            base.add(visitor_leads::Column::FollowUpDate.gte(today())),
        )
        .await?,
    })
}
