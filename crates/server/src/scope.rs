//! # Access Scoping
//!
//! Derives the row-visibility predicate for the acting user.
//!
//! | role           | users / leads visible                          |
//! |----------------|------------------------------------------------|
//! | platform_admin | everything, optionally narrowed by company_id  |
//! | company_admin  | own company; client company_id is ignored      |
//! | employee       | own company, and only own leads                |

use entity::{sea_orm_active_enums::UserRole, users, visitor_leads};
use error::Result;
use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;

/// Visibility derived from the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    Platform { company_filter: Option<Uuid> },
    Company { company_id: Uuid },
    Employee { company_id: Uuid, user_id: Uuid },
}

impl AccessScope {
    /// `requested_company` is honoured only for platform admins.
    pub fn for_user(user: &AuthenticatedUser, requested_company: Option<Uuid>) -> Result<Self> {
        Ok(match user.role {
            UserRole::PlatformAdmin => {
                AccessScope::Platform {
                    company_filter: requested_company,
                }
            },
            UserRole::CompanyAdmin => {
                AccessScope::Company {
                    company_id: user.require_company()?,
                }
            },
            UserRole::Employee => {
                AccessScope::Employee {
                    company_id: user.require_company()?,
                    user_id:    user.id,
                }
            },
        })
    }

    /// The company rows are confined to, if any.
    pub fn company_id(&self) -> Option<Uuid> {
        match *self {
            AccessScope::Platform {
                company_filter,
            } => company_filter,
            AccessScope::Company {
                company_id,
            } |
            AccessScope::Employee {
                company_id, ..
            } => Some(company_id),
        }
    }

    /// Employee filter for lead queries. A client-supplied employee is honoured for
    /// admins and replaced by the caller for employees.
    pub fn employee_id(&self, requested: Option<Uuid>) -> Option<Uuid> {
        match *self {
            AccessScope::Employee {
                user_id, ..
            } => Some(user_id),
            _ => requested,
        }
    }

    /// Predicate over `visitor_leads`.
    pub fn lead_condition(&self) -> Condition {
        self.lead_condition_with(None)
    }

    /// Predicate over `visitor_leads` with an optional admin-supplied employee filter.
    pub fn lead_condition_with(&self, requested_employee: Option<Uuid>) -> Condition {
        let mut condition = Condition::all();
        if let Some(company_id) = self.company_id() {
            condition = condition.add(visitor_leads::Column::CompanyId.eq(company_id));
        }
        if let Some(employee_id) = self.employee_id(requested_employee) {
            condition = condition.add(visitor_leads::Column::EmployeeId.eq(employee_id));
        }
        condition
    }

    /// Predicate over `users`.
    pub fn user_condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(company_id) = self.company_id() {
            condition = condition.add(users::Column::CompanyId.eq(company_id));
        }
        condition
    }

    /// Whether a lead row falls inside this scope.
    pub fn permits_lead(&self, lead: &visitor_leads::Model) -> bool {
        match *self {
            AccessScope::Platform {
                ..
            } => true,
            AccessScope::Company {
                company_id,
            } => lead.company_id == company_id,
            AccessScope::Employee {
                company_id,
                user_id,
            } => lead.company_id == company_id && lead.employee_id == user_id,
        }
    }
}
