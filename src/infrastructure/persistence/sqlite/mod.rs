pub mod application_repository;
pub mod user_repository;

pub use application_repository::SqliteApplicationRepository;
pub use user_repository::SqliteUserRepository;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::domain::auth::errors::RepositoryError;
use crate::infrastructure::config::DatabaseConfig;

/// Opens a connection pool, creating the database file if it is missing
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, RepositoryError> {
  let options = SqliteConnectOptions::from_str(&config.url)
    .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?
    .create_if_missing(true);

  // SQLite creates the file but not its directory
  if let Some(dir) = options.get_filename().parent() {
    if !dir.as_os_str().is_empty() {
      tokio::fs::create_dir_all(dir).await.map_err(|e| {
        RepositoryError::ConnectionFailed(format!(
          "cannot create database directory {}: {}",
          dir.display(),
          e
        ))
      })?;
    }
  }

  let pool = SqlitePoolOptions::new()
    .max_connections(config.max_connections)
    .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
    .connect_with(options)
    .await?;

  Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn migrate(pool: &SqlitePool) -> Result<(), RepositoryError> {
  sqlx::migrate!("./migrations")
    .run(pool)
    .await
    .map_err(|e| RepositoryError::DatabaseError(format!("migration failed: {}", e)))
}

/// Single-connection in-memory database with the schema applied
#[cfg(test)]
pub(crate) async fn setup_test_db() -> SqlitePool {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .idle_timeout(None)
    .max_lifetime(None)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to open in-memory database");

  migrate(&pool).await.expect("Failed to run migrations");

  pool
}
