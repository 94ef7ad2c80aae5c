//! Schema migrations shared by the folio storage backends.
//!
//! A backend lists its [`Migration`]s and implements [`MigrationManager`] on top of its
//! connection pool. Versions are plain integers applied in ascending order and recorded
//! in a tracking table.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::Database;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration failed: {0}")]
    Migration(String),
    #[error("Duplicate migration version {0}")]
    DuplicateVersion(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, MigrationError>;

#[async_trait]
pub trait Migration<DB: Database>: Send + Sync {
    async fn up<'a>(&'a self, conn: &'a mut <DB as Database>::Connection) -> Result<()>;

    async fn down<'a>(&'a self, conn: &'a mut <DB as Database>::Connection) -> Result<()>;

    /// Ordering key, unique within a backend
    fn version(&self) -> i64;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    /// Unix seconds
    pub applied_at: i64,
}

#[async_trait]
pub trait MigrationManager<DB: Database>: Send + Sync {
    fn get_migration_table_name(&self) -> &str {
        "_folio_migrations"
    }

    /// Create the tracking table if it is missing.
    async fn initialize(&self) -> Result<()>;

    /// Apply every migration that has not run yet, oldest first.
    async fn up(&self, migrations: &[Box<dyn Migration<DB>>]) -> Result<()>;

    /// Roll back applied migrations, newest first.
    async fn down(&self, migrations: &[Box<dyn Migration<DB>>]) -> Result<()>;

    async fn get_applied_migrations(&self) -> Result<Vec<MigrationRecord>>;

    async fn is_applied(&self, version: i64) -> Result<bool>;
}

/// Migrations from `migrations` missing from `applied`, sorted by version.
pub fn pending<'a, DB: Database>(
    migrations: &'a [Box<dyn Migration<DB>>],
    applied: &[MigrationRecord],
) -> Result<Vec<&'a dyn Migration<DB>>> {
    let mut seen = HashSet::new();
    for migration in migrations {
        if !seen.insert(migration.version()) {
            return Err(MigrationError::DuplicateVersion(migration.version()));
        }
    }

    let applied: HashSet<i64> = applied.iter().map(|record| record.version).collect();
    let mut pending: Vec<&dyn Migration<DB>> = migrations
        .iter()
        .map(|migration| migration.as_ref())
        .filter(|migration| !applied.contains(&migration.version()))
        .collect();
    pending.sort_by_key(|migration| migration.version());

    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Sqlite;

    struct Noop(i64);

    #[async_trait]
    impl Migration<Sqlite> for Noop {
        async fn up<'a>(&'a self, _conn: &'a mut sqlx::SqliteConnection) -> Result<()> {
            Ok(())
        }

        async fn down<'a>(&'a self, _conn: &'a mut sqlx::SqliteConnection) -> Result<()> {
            Ok(())
        }

        fn version(&self) -> i64 {
            self.0
        }

        fn name(&self) -> &str {
            "noop"
        }
    }

    fn record(version: i64) -> MigrationRecord {
        MigrationRecord {
            version,
            name: "noop".to_string(),
            applied_at: 0,
        }
    }

    #[test]
    fn test_pending_skips_applied_and_sorts() {
        let migrations: Vec<Box<dyn Migration<Sqlite>>> =
            vec![Box::new(Noop(3)), Box::new(Noop(1)), Box::new(Noop(2))];

        let versions: Vec<i64> = pending(&migrations, &[record(2)])
            .unwrap()
            .iter()
            .map(|m| m.version())
            .collect();
        assert_eq!(versions, vec![1, 3]);
    }

    #[test]
    fn test_duplicate_versions_rejected() {
        let migrations: Vec<Box<dyn Migration<Sqlite>>> =
            vec![Box::new(Noop(1)), Box::new(Noop(1))];
        assert!(matches!(
            pending(&migrations, &[]),
            Err(MigrationError::DuplicateVersion(1))
        ));
    }
}
