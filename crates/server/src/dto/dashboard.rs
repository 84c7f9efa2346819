//! # Dashboard Data Transfer Objects

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{companies::CompanySummary, leads::LeadRow, query_opt};

/// Query for the company dashboard
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyDashboardQuery {
    /// Required for platform admins
    #[serde(default, deserialize_with = "query_opt")]
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompanyCounts {
    pub total:  u64,
    pub active: u64,
}

/// Active users per role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserCounts {
    pub platform_admins: u64,
    pub company_admins:  u64,
    pub employees:       u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisitorCounts {
    pub total:        u64,
    pub last_30_days: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadCounts {
    pub total:        u64,
    pub last_30_days: u64,
    pub last_7_days:  u64,
    pub today:        u64,
}

/// Leads captured on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date:  NaiveDate,
    pub count: u64,
}

/// Platform-wide rollup
#[derive(Debug, Clone, Serialize)]
pub struct PlatformOverview {
    pub companies:       CompanyCounts,
    pub users:           UserCounts,
    pub visitors:        VisitorCounts,
    pub leads:           LeadCounts,
    pub recent_activity: Vec<DailyCount>,
}

/// One employee's position on the company leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub employee_id:       Uuid,
    pub full_name:         String,
    pub email:             String,
    pub leads_count:       u64,
    pub leads_last_7_days: u64,
}

/// Rollup for one company
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDashboard {
    pub company:          CompanySummary,
    pub active_employees: u64,
    pub leads:            LeadCounts,
    pub leaderboard:      Vec<LeaderboardEntry>,
    pub recent_leads:     Vec<LeadRow>,
}

/// Personal lead counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeStats {
    pub total_leads:        u64,
    pub leads_last_30_days: u64,
    pub leads_last_7_days:  u64,
    pub leads_today:        u64,
    pub pending_follow_ups: u64,
}

/// Rollup for the acting employee
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDashboard {
    pub stats:              EmployeeStats,
    pub recent_leads:       Vec<LeadRow>,
    pub upcoming_follow_ups: Vec<LeadRow>,
}
