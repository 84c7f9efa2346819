//! # Authentication Endpoints
//!
//! Login, account registration and self-service profile management.

pub mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::AppState;

/// Routes that need no token
pub fn public_routes() -> Router<AppState> { Router::new().route("/login", post(handlers::login)) }

/// Routes behind the auth middleware
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/change-password", put(handlers::change_password))
}
