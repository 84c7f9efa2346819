//! # Administration
//!
//! Company, user and company-admin management plus the role dashboards.

pub mod companies;
pub mod company_admins;
pub mod dashboard;
pub mod users;

use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::AppState;

/// Routes mounted under `/api/admin`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route("/companies/{id}", put(companies::update_company))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", put(users::update_user))
        .route("/users/{id}/deactivate", put(users::deactivate_user))
        .route("/employees/{id}", delete(users::remove_employee))
        .route(
            "/company-admins",
            get(company_admins::list_company_admins).post(company_admins::create_company_admin),
        )
        .route(
            "/company-admins/{id}",
            put(company_admins::update_company_admin).delete(company_admins::remove_company_admin),
        )
        .route("/dashboard/overview", get(dashboard::platform_overview))
        .route("/dashboard/company", get(dashboard::company_dashboard))
        .route("/dashboard/employee", get(dashboard::employee_dashboard))
}
