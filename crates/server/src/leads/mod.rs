//! # Lead Capture and Management
//!
//! A lead records that an employee met a visitor on a given day. At most one lead exists per
//! visitor, company and UTC capture day.

pub mod capture;
pub mod export;
pub mod handlers;
pub mod query;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// Routes mounted under `/api/leads`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::create_lead).get(handlers::list_leads),
        )
        .route("/stats/overview", get(handlers::lead_stats))
        .route("/export/csv", get(handlers::export_leads))
        .route(
            "/{id}",
            get(handlers::get_lead)
                .put(handlers::update_lead)
                .delete(handlers::delete_lead),
        )
}
