//! # Lead Data Transfer Objects

use chrono::{DateTime, NaiveDate, Utc};
use entity::{sea_orm_active_enums::Interest, visitor_leads};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{blank_as_none, patch_field, query_opt, visitors::{VisitorFields, VisitorSummary}, PageParams};

/// Request body for capturing a lead
///
/// Either `visitor_id` or `phone` + `full_name` identifies the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateLeadRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub visitor_id: Option<Uuid>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(min = 3, max = 50, message = "Phone must be between 3 and 50 characters"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 200, message = "Full name must be at most 200 characters"))]
    pub full_name: Option<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub visitor: VisitorFields,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub follow_up_date: Option<NaiveDate>,

    /// Required for platform admins, ignored for everyone else
    #[serde(default, deserialize_with = "blank_as_none")]
    pub company_id: Option<Uuid>,
}

/// Request body for updating a lead
///
/// Only these three fields are writable; anything else in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateLeadRequest {
    #[serde(default, deserialize_with = "patch_field")]
    pub interests:      Option<Option<Interest>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub notes:          Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub follow_up_date: Option<Option<NaiveDate>>,
}

/// Query parameters for lead list and export
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadListQuery {
    #[serde(flatten)]
    pub paging:      PageParams,
    /// First capture day, inclusive
    #[serde(default, deserialize_with = "query_opt")]
    pub date_from:   Option<NaiveDate>,
    /// Last capture day, inclusive
    #[serde(default, deserialize_with = "query_opt")]
    pub date_to:     Option<NaiveDate>,
    /// Ignored for employees
    #[serde(default, deserialize_with = "query_opt")]
    pub employee_id: Option<Uuid>,
    /// Honoured for platform admins only
    #[serde(default, deserialize_with = "query_opt")]
    pub company_id:  Option<Uuid>,
    /// Search over visitor name, phone and email
    pub search:      Option<String>,
}

/// Lead joined with visitor, employee and company display fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct LeadRow {
    pub id:             Uuid,
    pub company_id:     Uuid,
    pub visitor_id:     Uuid,
    pub employee_id:    Uuid,
    pub notes:          Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub organization:   Option<String>,
    pub designation:    Option<String>,
    pub city:           Option<String>,
    pub country:        Option<String>,
    pub interests:      Option<Interest>,
    pub capture_date:   NaiveDate,
    pub created_at:     DateTime<Utc>,
    pub updated_at:     DateTime<Utc>,
    pub visitor_phone:  String,
    pub visitor_name:   String,
    pub visitor_email:  Option<String>,
    pub employee_name:  String,
    pub employee_email: String,
    pub company_name:   String,
}

/// Response for a captured lead
#[derive(Debug, Clone, Serialize)]
pub struct CreatedLead {
    pub lead:    visitor_leads::Model,
    pub visitor: VisitorSummary,
}

/// Lead counts under the caller's scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadStats {
    pub total_leads:          u64,
    pub leads_last_30_days:   u64,
    pub leads_last_7_days:    u64,
    pub leads_today:          u64,
    pub leads_with_follow_up: u64,
    pub pending_follow_ups:   u64,
}
