use async_trait::async_trait;
use chrono::Utc;
use folio_core::{Error, UserId, repositories::PasswordRepository};
use sqlx::SqlitePool;

use crate::db_error;

pub struct SqlitePasswordRepository {
    pool: SqlitePool,
}

impl SqlitePasswordRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordRepository for SqlitePasswordRepository {
    async fn store_password_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO passwords (user_id, hash, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET hash = excluded.hash, updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id.as_str())
        .bind(hash)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to store password hash"))?;

        Ok(())
    }

    async fn password_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        sqlx::query_scalar("SELECT hash FROM passwords WHERE user_id = ?1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to load password hash"))
    }
}
