//! # Mobile API
//!
//! The surface used by the field app. Everything except login and registration is restricted
//! to employees, and the company always comes from the token.

pub mod handlers;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{auth::handlers as auth_handlers, middleware::auth::mobile_guard, AppState};

/// Routes that need no token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register))
}

/// Employee-only routes; mount behind the auth middleware
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(auth_handlers::get_profile).put(auth_handlers::update_profile),
        )
        .route(
            "/leads",
            post(handlers::create_lead).get(handlers::list_leads),
        )
        .route("/leads/{id}", put(handlers::update_lead))
        .route("/visitors/search", get(handlers::search_visitors))
        .route("/visitors/exists/{phone}", get(handlers::visitor_exists))
        .route(
            "/visitors/phone-suggestions/{query}",
            get(handlers::phone_suggestions),
        )
        .route_layer(middleware::from_fn(mobile_guard))
}
