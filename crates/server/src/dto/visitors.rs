//! # Visitor Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::{sea_orm_active_enums::Interest, visitors};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{blank_as_none, PageParams};

/// Request body for registering a visitor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateVisitorRequest {
    #[validate(length(min = 3, max = 50, message = "Phone must be between 3 and 50 characters"))]
    pub phone: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 200, message = "Full name must be at most 200 characters"))]
    pub full_name: Option<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub details: VisitorFields,
}

/// Optional visitor attributes shared by visitor and lead capture bodies
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct VisitorFields {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 200, message = "Organization must be at most 200 characters"))]
    pub organization: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 200, message = "Designation must be at most 200 characters"))]
    pub designation: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 100, message = "City must be at most 100 characters"))]
    pub city: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 100, message = "Country must be at most 100 characters"))]
    pub country: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub interests: Option<Interest>,
}

/// Request body for updating a visitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateVisitorRequest {
    #[validate(length(min = 1, max = 200, message = "Full name must be between 1 and 200 characters"))]
    pub full_name: Option<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub details: VisitorFields,
}

/// Query parameters for visitor list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitorListQuery {
    #[serde(flatten)]
    pub paging: PageParams,
    /// Search over name, phone, email and organization
    pub search: Option<String>,
}

/// Visitor as returned by the API
pub type VisitorResponse = visitors::Model;

/// Short visitor reference embedded in lead responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitorSummary {
    pub id:        Uuid,
    pub phone:     String,
    pub full_name: String,
}

impl From<&visitors::Model> for VisitorSummary {
    fn from(visitor: &visitors::Model) -> Self {
        Self {
            id:        visitor.id,
            phone:     visitor.phone.clone(),
            full_name: visitor.full_name.clone(),
        }
    }
}

/// Result of a phone search
#[derive(Debug, Clone, Serialize)]
pub struct VisitorSearchResponse {
    pub visitors: Vec<visitors::Model>,
    pub count:    usize,
}

/// Visitor registration counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitorStats {
    pub total_visitors:        u64,
    pub visitors_last_30_days: u64,
    pub visitors_last_7_days:  u64,
    pub visitors_today:        u64,
}

/// Visitor with how often they were captured as a lead
#[derive(Debug, Clone, Serialize)]
pub struct VisitorWithVisits {
    #[serde(flatten)]
    pub visitor:      visitors::Model,
    pub last_visit:   Option<DateTime<Utc>>,
    pub total_visits: u64,
}
