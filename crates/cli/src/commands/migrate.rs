//! # CLI Migration Command
//!
//! Database migration handling for the Expo Leads CLI.

use error::{AppError, Result, ResultExt as _};
use migration::{Migrator, MigratorTrait as _};
use tracing::info;

use crate::{
    commands::MigrateArgs,
    config::{build_database_url, DatabaseConfig},
};

/// Runs database migrations
///
/// Applies pending migrations and bootstrap seeds, or lists them with `--dry-run`, or
/// reverts the newest one with `--rollback`.
pub async fn migrate(config: &DatabaseConfig, args: &MigrateArgs) -> Result<()> {
    info!(
        target: "migrate",
        dry_run = %args.dry_run,
        rollback = %args.rollback,
        "Running database migrations..."
    );

    let db = migration::connect_to_database(&build_database_url(config), config.pool_options())
        .await
        .context("Failed to connect to database")?;

    if args.dry_run {
        let pending = Migrator::get_pending_migrations(&db)
            .await
            .map_err(|e| AppError::migration(format!("Failed to get pending migrations: {}", e)))?;

        info!(target: "migrate", pending_count = %pending.len(), "Pending migrations found");
        for m in &pending {
            info!(target: "migrate", migration = %m.name(), "Would apply");
        }
        return Ok(());
    }

    if args.rollback {
        info!(target: "migrate", "Rolling back the last migration...");
        Migrator::down(&db, Some(1))
            .await
            .map_err(|e| AppError::migration(format!("Failed to rollback migration: {}", e)))?;
        info!(target: "migrate", "Rollback completed successfully");
        return Ok(());
    }

    Migrator::up(&db, None)
        .await
        .map_err(|e| AppError::migration(format!("Failed to run migrations: {}", e)))?;
    info!(target: "migrate", "Migrations completed successfully");

    let seeds = migration::seeds::run_all_seeds(&db, true).await?;
    info!(target: "migrate", seeds = seeds.len(), "Seed data completed");
    Ok(())
}
