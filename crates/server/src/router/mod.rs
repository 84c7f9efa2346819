//! # API Router Configuration
//!
//! Configures API routes for the Expo Leads service.

use axum::{
    extract::State,
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use error::ApiResponse;
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    admin,
    auth,
    leads,
    middleware::{auth::auth_middleware, request_id::request_id_middleware},
    mobile,
    settings::ServerSettings,
    visitors,
    AppState,
};

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status:         &'static str,
    pub uptime_seconds: u64,
}

async fn health(State(state): State<AppState>) -> ApiResponse<HealthStatus> {
    ApiResponse::ok(HealthStatus {
        status:         "ok",
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// Routes that require a bearer token
pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::protected_routes())
        .nest("/api/admin", admin::routes())
        .nest("/api/visitors", visitors::routes())
        .nest("/api/leads", leads::routes())
        .nest("/api/mobile", mobile::protected_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Routes open to anonymous callers
pub fn create_public_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth::public_routes())
        .nest("/api/mobile", mobile::public_routes())
}

/// CORS policy; an empty origin list allows any origin.
pub fn cors_layer(settings: &ServerSettings) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if settings.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();
    layer.allow_origin(origins)
}

/// Creates the main application router
///
/// # Arguments
///
/// * `state` - Application state containing DB pool and config
///
/// # Returns
///
/// Main router with health checks and API routes
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .merge(create_public_router())
        .merge(create_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.settings))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
