//! Database connection pool and migration management.
//!
//! This module provides utilities for:
//! - Creating and managing a PostgreSQL connection pool
//! - Bounding row-lock waits with a per-connection `lock_timeout`
//! - Running database migrations automatically

use std::{str::FromStr, time::Duration};

use sqlx::{
    Pool, Postgres,
    postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::config::Config;

/// Type alias for PostgreSQL connection pool.
///
/// Instead of writing `Pool<Postgres>` everywhere, we can use `DbPool`.
pub type DbPool = Pool<Postgres>;

/// Connection options derived from the configuration.
///
/// Every connection opened by the pool starts with `lock_timeout` set, so a
/// `SELECT ... FOR UPDATE` that waits too long on another wallet mutation fails
/// with SQLSTATE `55P03` instead of hanging the request.
///
/// # Errors
///
/// Returns an error if the database URL cannot be parsed.
pub fn connect_options(config: &Config) -> Result<PgConnectOptions, sqlx::Error> {
    let options = PgConnectOptions::from_str(&config.database_url)?;

    if config.lock_timeout_ms == 0 {
        // Keep the server default (wait indefinitely)
        return Ok(options);
    }

    Ok(options.options([("lock_timeout", config.lock_timeout_ms.to_string())]))
}

/// Pool sizing and acquire timeout derived from the configuration.
pub fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
}

/// Create a new PostgreSQL connection pool.
///
/// A connection pool maintains multiple database connections that can be reused across HTTP requests.
/// Each in-flight wallet mutation holds one connection for the duration of its transaction, so the
/// pool size bounds how many mutations (across all wallets) can be in progress at once.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection string is invalid
/// - Cannot connect to PostgreSQL server
/// - Database authentication fails
pub async fn create_pool(config: &Config) -> Result<DbPool, sqlx::Error> {
    pool_options(config)
        .connect_with(connect_options(config)?)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are tracked in the `_sqlx_migrations` table, so each migration runs only once.
///
/// # Errors
///
/// Returns an error if:
/// - SQL syntax errors in migration files
/// - Database errors during migration execution
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}
