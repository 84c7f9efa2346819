//! # Seed Data Management
//!
//! Bootstrap data applied after migrations. Every seed is idempotent and reports a
//! [`SeedResult`] whether or not it inserted anything.

use std::time::Instant;

use ::error::{AppError, SeedResult};
use auth::secrecy::{ExposeSecret, SecretString};
use entity::{sea_orm_active_enums::UserRole, users};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};

/// Trait for seed data providers
///
/// Implement this trait to provide seed data for the database.
#[async_trait::async_trait]
pub trait SeedProvider: Send + Sync {
    /// The name of this seed
    fn name(&self) -> &str;

    /// Runs the seed operation
    ///
    /// # Errors
    ///
    /// Returns an error if the seed operation fails.
    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError>;
}

/// Creates the first platform admin when none exists yet.
pub struct PlatformAdminSeed {
    pub email:     String,
    pub password:  SecretString,
    pub full_name: String,
}

impl PlatformAdminSeed {
    /// Built from `EXPO_BOOTSTRAP_ADMIN_EMAIL` and `EXPO_BOOTSTRAP_ADMIN_PASSWORD`; `None` when
    /// either is unset.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("EXPO_BOOTSTRAP_ADMIN_EMAIL").ok()?;
        let password = std::env::var("EXPO_BOOTSTRAP_ADMIN_PASSWORD").ok()?;
        Some(Self {
            email:     email.trim().to_lowercase(),
            password:  SecretString::from(password),
            full_name: std::env::var("EXPO_BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|_| "Platform Admin".to_string()),
        })
    }
}

#[async_trait::async_trait]
impl SeedProvider for PlatformAdminSeed {
    fn name(&self) -> &str { "platform_admin" }

    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError> {
        let started = Instant::now();

        let existing = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::PlatformAdmin))
            .count(db)
            .await?;
        if existing > 0 {
            return Ok(SeedResult::skipped(self.name()));
        }

        if let Err(errors) = auth::validate_password_strength(self.password.expose_secret()) {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Ok(SeedResult::with_error(self.name(), &message));
        }

        let password_hash = auth::hash_password(&self.password, None)?;
        let now = chrono::Utc::now();

        users::ActiveModel {
            id:            Set(uuid::Uuid::new_v4()),
            email:         Set(self.email.clone()),
            password_hash: Set(password_hash.expose_secret().to_string()),
            full_name:     Set(self.full_name.clone()),
            phone:         Set(None),
            role:          Set(UserRole::PlatformAdmin),
            company_id:    Set(None),
            is_active:     Set(true),
            created_at:    Set(now),
            updated_at:    Set(now),
        }
        .insert(db)
        .await?;

        tracing::info!(email = %self.email, "Bootstrap platform admin created");

        Ok(SeedResult::success(
            self.name(),
            1,
            started.elapsed().as_millis() as u64,
        ))
    }
}

/// Seed providers enabled by the current environment.
pub fn providers_from_env() -> Vec<Box<dyn SeedProvider>> {
    let mut providers: Vec<Box<dyn SeedProvider>> = Vec::new();
    if let Some(seed) = PlatformAdminSeed::from_env() {
        providers.push(Box::new(seed));
    }
    providers
}

/// Runs all registered seed providers
///
/// # Arguments
///
/// * `db` - The database connection
/// * `verbose` - Whether to log each result
///
/// # Errors
///
/// Returns an error if any seed operation fails.
pub async fn run_all_seeds(db: &DatabaseConnection, verbose: bool) -> Result<Vec<SeedResult>, AppError> {
    run_seeds(db, &providers_from_env(), verbose).await
}

/// Runs the given seed providers in order.
pub async fn run_seeds(
    db: &DatabaseConnection,
    providers: &[Box<dyn SeedProvider>],
    verbose: bool,
) -> Result<Vec<SeedResult>, AppError> {
    let mut results = Vec::with_capacity(providers.len());

    for provider in providers {
        let result = provider.run(db).await?;
        if !result.is_success() {
            tracing::warn!(seed = %result.seed_name, errors = ?result.errors, "Seed reported errors");
        }
        else if verbose {
            tracing::info!(
                seed = %result.seed_name,
                inserted = result.inserted_count,
                duration_ms = result.duration_ms,
                "Seed applied"
            );
        }
        results.push(result);
    }

    Ok(results)
}
