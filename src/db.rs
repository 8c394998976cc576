use std::{str::FromStr, time::Duration};

use anyhow::Result;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub type DbPool = SqlitePool;

pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// Opens the pool and applies `migrations/`.
///
/// An in-memory database exists only as long as the connection that created
/// it, so such pools hold exactly one connection that is never recycled.
pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
    .acquire_timeout(Duration::from_secs(10))
    .connect_with(options)
    .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::debug!(in_memory, "database ready");
    Ok(pool)
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
