//! # Expo Leads Schema
//!
//! Sea-ORM migrations for the Expo Leads database plus bootstrap seed data.
//! The schema avoids vendor-specific types so it runs on PostgreSQL and SQLite alike.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_companies_table;
mod m20260301_000002_create_users_table;
mod m20260301_000003_create_visitors_table;
mod m20260301_000004_create_visitor_leads_table;
pub mod seeds;

/// Applies every schema migration in order.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_companies_table::Migration),
            Box::new(m20260301_000002_create_users_table::Migration),
            Box::new(m20260301_000003_create_visitors_table::Migration),
            Box::new(m20260301_000004_create_visitor_leads_table::Migration),
        ]
    }
}

/// Connection pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout:    Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 20,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout:    Duration::from_secs(30),
        }
    }
}

/// Database connection helper for CLI usage
pub async fn connect_to_database(database_url: &str, pool: PoolOptions) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(pool.max_connections)
        .acquire_timeout(pool.acquire_timeout)
        .idle_timeout(pool.idle_timeout)
        .sqlx_logging(false);
    Database::connect(options).await
}
