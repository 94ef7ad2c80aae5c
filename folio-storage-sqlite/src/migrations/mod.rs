use async_trait::async_trait;
use chrono::Utc;
use folio_migration::{Migration, MigrationError, MigrationManager, MigrationRecord, pending};
use sqlx::{Database, Sqlite, SqliteConnection, SqlitePool};

pub struct SqliteMigrationManager {
    pool: SqlitePool,
}

impl SqliteMigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MigrationManager<Sqlite> for SqliteMigrationManager {
    async fn initialize(&self) -> Result<(), MigrationError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at INTEGER NOT NULL DEFAULT (unixepoch())
            );"#,
            self.get_migration_table_name()
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn up(&self, migrations: &[Box<dyn Migration<Sqlite>>]) -> Result<(), MigrationError> {
        let applied = self.get_applied_migrations().await?;

        for migration in pending(migrations, &applied)? {
            let mut tx = self.pool.begin().await?;

            tracing::info!(
                version = migration.version(),
                name = migration.name(),
                "Applying migration"
            );

            migration
                .up(&mut *tx as &mut <Sqlite as Database>::Connection)
                .await?;

            sqlx::query(&format!(
                "INSERT INTO {} (version, name, applied_at) VALUES (?, ?, ?)",
                self.get_migration_table_name()
            ))
            .bind(migration.version())
            .bind(migration.name())
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
        }

        Ok(())
    }

    async fn down(&self, migrations: &[Box<dyn Migration<Sqlite>>]) -> Result<(), MigrationError> {
        let mut ordered: Vec<&dyn Migration<Sqlite>> =
            migrations.iter().map(|m| m.as_ref()).collect();
        ordered.sort_by_key(|m| std::cmp::Reverse(m.version()));

        for migration in ordered {
            if !self.is_applied(migration.version()).await? {
                continue;
            }

            let mut tx = self.pool.begin().await?;

            tracing::info!(
                version = migration.version(),
                name = migration.name(),
                "Rolling back migration"
            );

            migration
                .down(&mut *tx as &mut <Sqlite as Database>::Connection)
                .await?;

            sqlx::query(&format!(
                "DELETE FROM {} WHERE version = ?",
                self.get_migration_table_name()
            ))
            .bind(migration.version())
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
        }

        Ok(())
    }

    async fn get_applied_migrations(&self) -> Result<Vec<MigrationRecord>, MigrationError> {
        let records = sqlx::query_as::<_, MigrationRecord>(&format!(
            "SELECT version, name, applied_at FROM {} ORDER BY version",
            self.get_migration_table_name()
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn is_applied(&self, version: i64) -> Result<bool, MigrationError> {
        let applied: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE version = ?)",
            self.get_migration_table_name()
        ))
        .bind(version)
        .fetch_one(&self.pool)
        .await?;
        Ok(applied)
    }
}

async fn execute_all(conn: &mut SqliteConnection, statements: &[&str]) -> Result<(), MigrationError> {
    for statement in statements {
        sqlx::query(*statement).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Declares a migration from its version, name, forward statements and reverse statements.
macro_rules! sqlite_migration {
    ($ty:ident, $version:literal, up: [$($up:literal),+ $(,)?], down: [$($down:literal),+ $(,)?]) => {
        pub struct $ty;

        #[async_trait]
        impl Migration<Sqlite> for $ty {
            fn version(&self) -> i64 {
                $version
            }

            fn name(&self) -> &str {
                stringify!($ty)
            }

            async fn up<'a>(
                &'a self,
                conn: &'a mut <Sqlite as Database>::Connection,
            ) -> Result<(), MigrationError> {
                execute_all(conn, &[$($up),+]).await
            }

            async fn down<'a>(
                &'a self,
                conn: &'a mut <Sqlite as Database>::Connection,
            ) -> Result<(), MigrationError> {
                execute_all(conn, &[$($down),+]).await
            }
        }
    };
}

sqlite_migration!(
    CreateUsersTable,
    1,
    up: [r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            role TEXT NOT NULL DEFAULT 'admin',
            locked_at INTEGER,
            created_at INTEGER NOT NULL DEFAULT (unixepoch()),
            updated_at INTEGER NOT NULL DEFAULT (unixepoch())
        );"#],
    down: ["DROP TABLE IF EXISTS users"]
);

sqlite_migration!(
    CreatePasswordsTable,
    2,
    up: [r#"
        CREATE TABLE IF NOT EXISTS passwords (
            user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            hash TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT (unixepoch())
        );"#],
    down: ["DROP TABLE IF EXISTS passwords"]
);

sqlite_migration!(
    CreateFailedLoginsTable,
    3,
    up: [
        r#"
        CREATE TABLE IF NOT EXISTS failed_login_attempts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            ip_address TEXT,
            attempted_at INTEGER NOT NULL
        );"#,
        "CREATE INDEX IF NOT EXISTS idx_failed_login_attempts_email_time ON failed_login_attempts(email, attempted_at)",
    ],
    down: ["DROP TABLE IF EXISTS failed_login_attempts"]
);

sqlite_migration!(
    CreateContactMessagesTable,
    4,
    up: [
        r#"
        CREATE TABLE IF NOT EXISTS contact_messages (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            subject TEXT NOT NULL,
            message TEXT NOT NULL,
            read INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        );"#,
        "CREATE INDEX IF NOT EXISTS idx_contact_messages_email_time ON contact_messages(email, created_at)",
    ],
    down: ["DROP TABLE IF EXISTS contact_messages"]
);

sqlite_migration!(
    CreateProfileTable,
    5,
    up: [r#"
        CREATE TABLE IF NOT EXISTS profile (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            name TEXT NOT NULL,
            title TEXT NOT NULL,
            bio TEXT NOT NULL,
            avatar TEXT,
            resume_url TEXT,
            skills TEXT NOT NULL DEFAULT '[]',
            socials TEXT,
            updated_at INTEGER NOT NULL
        );"#],
    down: ["DROP TABLE IF EXISTS profile"]
);

sqlite_migration!(
    CreateProjectsTable,
    6,
    up: [r#"
        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            summary TEXT,
            description TEXT,
            content TEXT,
            image TEXT,
            github_url TEXT,
            live_url TEXT,
            tech_stack TEXT NOT NULL DEFAULT '[]',
            featured INTEGER NOT NULL DEFAULT 0,
            is_personal INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );"#],
    down: ["DROP TABLE IF EXISTS projects"]
);

sqlite_migration!(
    CreateBlogPostsTable,
    7,
    up: [
        r#"
        CREATE TABLE IF NOT EXISTS blog_posts (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            excerpt TEXT,
            content TEXT NOT NULL,
            cover_image TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            published INTEGER NOT NULL DEFAULT 1,
            read_time INTEGER,
            views INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );"#,
        "CREATE INDEX IF NOT EXISTS idx_blog_posts_published_time ON blog_posts(published, created_at)",
    ],
    down: ["DROP TABLE IF EXISTS blog_posts"]
);

sqlite_migration!(
    CreateResumeTables,
    8,
    up: [
        r#"
        CREATE TABLE IF NOT EXISTS experience (
            id TEXT PRIMARY KEY,
            position TEXT NOT NULL,
            company TEXT NOT NULL,
            location TEXT,
            start_date TEXT NOT NULL,
            end_date TEXT,
            description TEXT,
            technologies TEXT NOT NULL DEFAULT '[]',
            sort_order INTEGER NOT NULL DEFAULT 0
        );"#,
        r#"
        CREATE TABLE IF NOT EXISTS education (
            id TEXT PRIMARY KEY,
            degree TEXT NOT NULL,
            institution TEXT NOT NULL,
            location TEXT,
            start_date TEXT NOT NULL,
            end_date TEXT,
            description TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0
        );"#,
        r#"
        CREATE TABLE IF NOT EXISTS certifications (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            issuer TEXT NOT NULL,
            date TEXT NOT NULL,
            url TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0
        );"#,
    ],
    down: [
        "DROP TABLE IF EXISTS certifications",
        "DROP TABLE IF EXISTS education",
        "DROP TABLE IF EXISTS experience",
    ]
);

/// Every migration this backend knows about.
pub fn all() -> Vec<Box<dyn Migration<Sqlite>>> {
    vec![
        Box::new(CreateUsersTable),
        Box::new(CreatePasswordsTable),
        Box::new(CreateFailedLoginsTable),
        Box::new(CreateContactMessagesTable),
        Box::new(CreateProfileTable),
        Box::new(CreateProjectsTable),
        Box::new(CreateBlogPostsTable),
        Box::new(CreateResumeTables),
    ]
}
