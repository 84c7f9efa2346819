//! # CLI Server
//!
//! Server startup for the Expo Leads CLI.

use anyhow::anyhow;
use auth::JwtConfig;
use error::{AppError, ErrorHandler, Result, ResultExt as _};
use migration::{Migrator, MigratorTrait as _};
use server::{create_app_router, settings::env_flag, AppState, ServerSettings};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    commands::ServeArgs,
    config::{build_database_url, parse_socket_addr, DatabaseConfig},
};

/// Starts the API server
///
/// Migrations and bootstrap seeds run before the listener is bound.
pub async fn serve(config: &DatabaseConfig, args: &ServeArgs) -> Result<()> {
    info!(target: "serve", host = %args.host, port = %args.port, "Starting API server...");

    let jwt_config = JwtConfig::from_env()?;
    let settings = ServerSettings::from_env();
    ErrorHandler::install(env_flag("EXPO_ERROR_DETAILS"));

    info!(target: "serve", pool_size = config.pool_size, "Connecting to database...");
    let db = migration::connect_to_database(&build_database_url(config), config.pool_options())
        .await
        .context("Failed to connect to database")?;

    info!(target: "serve", "Running database migrations...");
    Migrator::up(&db, None)
        .await
        .map_err(|e| AppError::migration(format!("Failed to run database migrations: {}", e)))?;
    migration::seeds::run_all_seeds(&db, true).await?;
    info!(target: "serve", "Database ready");

    if settings.mobile_self_registration {
        warn!(target: "serve", "Mobile self-registration is enabled");
    }

    let app = create_app_router(AppState::new(db, jwt_config, settings));

    let address = parse_socket_addr(&args.host, args.port)
        .map_err(|e| anyhow!("Invalid address {}:{}: {}", args.host, args.port, e))?;
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {}: {}", address, e))?;

    info!(target: "serve", %address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("HTTP server error: {}", e))?;

    info!(target: "serve", "Server stopped");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(target: "serve", error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(target: "serve", error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(target: "serve", "Shutdown signal received");
}
