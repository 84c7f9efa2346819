//! # Expo Leads API Server
//!
//! Axum-based HTTP API for the Expo Leads service.
//!
//! ## Modules
//!
//! - [`auth`]: Login, registration and profile endpoints
//! - [`admin`]: Company, user and dashboard management
//! - [`visitors`]: Visitor directory and phone reconciliation
//! - [`leads`]: Lead capture, listing, stats and export
//! - [`mobile`]: Employee-only surface used by the field app
//! - [`middleware`]: Request ID and authentication layers
//! - [`router`]: API route configuration

pub mod accounts;
pub mod admin;
pub mod auth;
pub mod dto;
pub mod extract;
pub mod leads;
pub mod middleware;
pub mod mobile;
pub mod router;
pub mod scope;
pub mod settings;
pub mod utils;
pub mod visitors;

use ::auth::JwtConfig;
pub use router::create_app_router;
pub use settings::ServerSettings;

/// Application state shared across request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db:         sea_orm::DatabaseConnection,
    /// JWT configuration
    pub jwt_config: JwtConfig,
    /// Runtime switches
    pub settings:   ServerSettings,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(db: sea_orm::DatabaseConnection, jwt_config: JwtConfig, settings: ServerSettings) -> Self {
        Self {
            db,
            jwt_config,
            settings,
            start_time: std::time::Instant::now(),
        }
    }
}
