//! # Company Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::{companies, sea_orm_active_enums::CompanyStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{blank_as_none, patch_field, query_opt, PageParams};

/// Query parameters for company list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyListQuery {
    #[serde(flatten)]
    pub paging: PageParams,
    /// Search over name and company code
    pub search: Option<String>,
    #[serde(default, deserialize_with = "query_opt")]
    pub status: Option<CompanyStatus>,
}

/// Request body for creating a company
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 2, max = 200, message = "Name must be between 2 and 200 characters"))]
    pub name: String,

    /// Generated when absent
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 20, message = "Company code must be at most 20 characters"))]
    pub company_code: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "Invalid email format"))]
    pub contact_email: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 50, message = "Contact phone must be at most 50 characters"))]
    pub contact_phone: Option<String>,
}

/// Request body for updating a company
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 2, max = 200, message = "Name must be between 2 and 200 characters"))]
    pub name: Option<String>,

    /// `null` or blank clears the stored value
    #[serde(default, deserialize_with = "patch_field")]
    #[validate(email(message = "Invalid email format"))]
    pub contact_email: Option<Option<String>>,

    #[serde(default, deserialize_with = "patch_field")]
    #[validate(length(max = 50, message = "Contact phone must be at most 50 characters"))]
    pub contact_phone: Option<Option<String>>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<CompanyStatus>,
}

/// Company row with headcount and lead totals
#[derive(Debug, Clone, Serialize)]
pub struct CompanySummary {
    pub id:             Uuid,
    pub name:           String,
    pub company_code:   String,
    pub contact_email:  Option<String>,
    pub contact_phone:  Option<String>,
    pub status:         CompanyStatus,
    pub created_at:     DateTime<Utc>,
    pub updated_at:     DateTime<Utc>,
    pub total_users:    u64,
    pub company_admins: u64,
    pub employees:      u64,
    pub total_leads:    u64,
}

impl CompanySummary {
    pub fn new(company: companies::Model) -> Self {
        Self {
            id:             company.id,
            name:           company.name,
            company_code:   company.company_code,
            contact_email:  company.contact_email,
            contact_phone:  company.contact_phone,
            status:         company.status,
            created_at:     company.created_at,
            updated_at:     company.updated_at,
            total_users:    0,
            company_admins: 0,
            employees:      0,
            total_leads:    0,
        }
    }
}
