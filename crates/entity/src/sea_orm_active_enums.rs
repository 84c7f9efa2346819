//! Shared enumerations
//!
//! Stored as short strings so the schema stays portable between PostgreSQL and SQLite.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role carried by every user account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Operates the whole platform, not tied to a company
    #[sea_orm(string_value = "platform_admin")]
    PlatformAdmin,
    /// Manages a single company and its employees
    #[sea_orm(string_value = "company_admin")]
    CompanyAdmin,
    /// Captures leads on the floor
    #[sea_orm(string_value = "employee")]
    Employee,
}

impl UserRole {
    /// Roles below platform level must belong to a company.
    pub fn requires_company(self) -> bool { !matches!(self, UserRole::PlatformAdmin) }

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::PlatformAdmin => "platform_admin",
            UserRole::CompanyAdmin => "company_admin",
            UserRole::Employee => "employee",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "platform_admin" => Ok(UserRole::PlatformAdmin),
            "company_admin" => Ok(UserRole::CompanyAdmin),
            "employee" => Ok(UserRole::Employee),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Company lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl std::fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompanyStatus::Active => write!(f, "active"),
            CompanyStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for CompanyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CompanyStatus::Active),
            "inactive" => Ok(CompanyStatus::Inactive),
            other => Err(format!("unknown company status: {}", other)),
        }
    }
}

/// Visitor interest temperature
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Interest {
    #[sea_orm(string_value = "Hot")]
    Hot,
    #[sea_orm(string_value = "Warm")]
    Warm,
    #[sea_orm(string_value = "Cold")]
    Cold,
}

impl std::fmt::Display for Interest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interest::Hot => write!(f, "Hot"),
            Interest::Warm => write!(f, "Warm"),
            Interest::Cold => write!(f, "Cold"),
        }
    }
}

impl std::str::FromStr for Interest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Hot" => Ok(Interest::Hot),
            "Warm" => Ok(Interest::Warm),
            "Cold" => Ok(Interest::Cold),
            other => Err(format!("unknown interest: {}", other)),
        }
    }
}
