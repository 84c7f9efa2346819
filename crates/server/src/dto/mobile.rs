//! # Mobile Data Transfer Objects

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{blank_as_none, visitors::VisitorWithVisits, PageParams};

/// Default page size for the mobile lead list.
pub const MOBILE_PAGE_SIZE: u64 = 20;

/// Request body for employee self-registration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct MobileRegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 256, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 200, message = "Full name must be between 2 and 200 characters"))]
    pub full_name: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 20, message = "Company code is required"))]
    pub company_code: String,
}

/// Query for the employee's own leads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MobileLeadListQuery {
    #[serde(flatten)]
    pub paging: PageParams,
    /// Search over visitor name, phone and lead organization
    pub search: Option<String>,
}

/// Query for visitor lookup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitorLookupQuery {
    pub phone:     Option<String>,
    pub full_name: Option<String>,
}

/// Answer to "have we met this phone before?"
#[derive(Debug, Clone, Serialize)]
pub struct VisitorExistsResponse {
    pub exists:  bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor: Option<VisitorWithVisits>,
}

/// Phone completions rendered as `"<phone> (<full_name>)"`
#[derive(Debug, Clone, Serialize)]
pub struct PhoneSuggestions {
    pub suggestions: Vec<String>,
}
