//! # Visitor Directory
//!
//! Platform-wide visitor records keyed by phone number.

pub mod handlers;
pub mod reconcile;

use axum::{
    routing::{get, post},
    Router,
};

pub use reconcile::find_or_create;

use crate::AppState;

/// Routes mounted under `/api/visitors`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::create_visitor).get(handlers::list_visitors),
        )
        .route("/search/{phone}", get(handlers::search_by_phone))
        .route("/stats/overview", get(handlers::visitor_stats))
        .route(
            "/{id}",
            get(handlers::get_visitor)
                .put(handlers::update_visitor)
                .delete(handlers::delete_visitor),
        )
}
