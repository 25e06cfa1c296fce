//! Postgres persistence for the songbook service.
//!
//! - [`models`] -- row structs and request DTOs.
//! - [`store`] -- the generic versioned entity store (optimistic concurrency,
//!   safelisted sorting, windowed pagination).
//! - [`repositories`] -- per-table repositories built on the store.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub type DbPool = sqlx::PgPool;

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl PoolConfig {
    /// Load pool configuration from environment variables.
    ///
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `DATABASE_URL`            | --      |
    /// | `DB_MAX_CONNECTIONS`      | `25`    |
    /// | `DB_MIN_CONNECTIONS`      | `0`     |
    /// | `DB_IDLE_TIMEOUT_SECS`    | `900`   |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`     |
    ///
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is unset or a numeric variable does not parse.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        Self {
            database_url,
            max_connections: env_or("DB_MAX_CONNECTIONS", 25),
            min_connections: env_or("DB_MIN_CONNECTIONS", 0),
            idle_timeout: Duration::from_secs(env_or("DB_IDLE_TIMEOUT_SECS", 900)),
            acquire_timeout: Duration::from_secs(env_or("DB_ACQUIRE_TIMEOUT_SECS", 5)),
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid number: {e}")),
        Err(_) => default,
    }
}

/// Create a connection pool from the given configuration.
pub async fn create_pool(config: &PoolConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .idle_timeout(config.idle_timeout)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
