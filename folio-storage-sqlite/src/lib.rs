//! SQLite storage for folio.
//!
//! [`SqliteRepositoryProvider`] implements every repository trait from `folio-core` on
//! one [`SqlitePool`]. Timestamps are stored as unix seconds, calendar dates as ISO
//! text and string lists as JSON arrays.
//!
//! ```rust,ignore
//! let provider = SqliteRepositoryProvider::connect("sqlite://folio.db?mode=rwc").await?;
//! provider.migrate().await?;
//! ```

mod migrations;
pub mod repositories;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use folio_core::{Error, error::StorageError};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub use repositories::SqliteRepositoryProvider;

impl SqliteRepositoryProvider {
    /// Open a pool for `database_url` with foreign keys enforced.
    ///
    /// In-memory databases get a single connection, since every SQLite connection to
    /// `:memory:` would otherwise see its own empty database.
    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to open SQLite database");
                StorageError::Connection(e.to_string())
            })?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Log a driver error and translate it. Unique violations become `Constraint`.
pub(crate) fn db_error(e: sqlx::Error, context: &'static str) -> Error {
    tracing::error!(error = %e, "{context}");
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StorageError::Constraint(context.to_string()).into()
        }
        _ => StorageError::Database(context.to_string()).into(),
    }
}

pub(crate) fn from_unix(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_default()
}

#[cfg(test)]
pub(crate) async fn setup_test_db() -> SqlitePool {
    use folio_core::repositories::RepositoryProvider;

    let provider = SqliteRepositoryProvider::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    provider.migrate().await.expect("Failed to run migrations");
    provider.pool().clone()
}
