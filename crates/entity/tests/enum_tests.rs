//! Enum string-form tests for the entity crate

use std::str::FromStr;

use entity::sea_orm_active_enums::{CompanyStatus, Interest, UserRole};
use sea_orm::ActiveEnum;

/// Test UserRole display values
#[test]
fn test_user_role_values() {
    assert_eq!(format!("{}", UserRole::PlatformAdmin), "platform_admin");
    assert_eq!(format!("{}", UserRole::CompanyAdmin), "company_admin");
    assert_eq!(format!("{}", UserRole::Employee), "employee");
}

/// Display and the stored value agree
#[test]
fn test_user_role_db_value_matches_display() {
    for role in [UserRole::PlatformAdmin, UserRole::CompanyAdmin, UserRole::Employee] {
        assert_eq!(role.to_value(), role.to_string());
        assert_eq!(UserRole::from_str(&role.to_string()).unwrap(), role);
    }
    assert!(UserRole::from_str("superuser").is_err());
}

#[test]
fn test_user_role_requires_company() {
    assert!(!UserRole::PlatformAdmin.requires_company());
    assert!(UserRole::CompanyAdmin.requires_company());
    assert!(UserRole::Employee.requires_company());
}

/// Test UserRole serde form
#[test]
fn test_user_role_serde() {
    assert_eq!(
        serde_json::to_string(&UserRole::CompanyAdmin).unwrap(),
        "\"company_admin\""
    );
    let role: UserRole = serde_json::from_str("\"employee\"").unwrap();
    assert_eq!(role, UserRole::Employee);
}

/// Test CompanyStatus values and default
#[test]
fn test_company_status_values() {
    assert_eq!(format!("{}", CompanyStatus::Active), "active");
    assert_eq!(format!("{}", CompanyStatus::Inactive), "inactive");
    assert_eq!(CompanyStatus::default(), CompanyStatus::Active);
    assert_eq!(CompanyStatus::Inactive.to_value(), "inactive");
    assert_eq!(CompanyStatus::from_str("inactive").unwrap(), CompanyStatus::Inactive);
    assert!(CompanyStatus::from_str("archived").is_err());
}

/// Interests keep their capitalised wire form
#[test]
fn test_interest_values() {
    assert_eq!(format!("{}", Interest::Hot), "Hot");
    assert_eq!(Interest::Warm.to_value(), "Warm");
    assert_eq!(serde_json::to_string(&Interest::Cold).unwrap(), "\"Cold\"");
    assert!(serde_json::from_str::<Interest>("\"hot\"").is_err());
    assert_eq!(Interest::from_str("Warm").unwrap(), Interest::Warm);
}
