use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{
    Error,
    content::{ContactMessage, NewContactMessage, Page},
    error::StorageError,
    repositories::ContactRepository,
};
use sqlx::SqlitePool;

use crate::{db_error, from_unix};

pub struct SqliteContactRepository {
    pool: SqlitePool,
}

impl SqliteContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteContactMessage {
    id: String,
    name: String,
    email: String,
    subject: String,
    message: String,
    read: bool,
    created_at: i64,
}

impl From<SqliteContactMessage> for ContactMessage {
    fn from(row: SqliteContactMessage) -> Self {
        ContactMessage {
            id: row.id,
            name: row.name,
            email: row.email,
            subject: row.subject,
            message: row.message,
            read: row.read,
            created_at: from_unix(row.created_at),
        }
    }
}

#[async_trait]
impl ContactRepository for SqliteContactRepository {
    async fn count_submissions(&self, email: &str, since: DateTime<Utc>) -> Result<u64, Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contact_messages WHERE email = ?1 AND created_at >= ?2",
        )
        .bind(email)
        .bind(since.timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to count contact submissions"))?;

        Ok(count as u64)
    }

    async fn create_submission(&self, message: NewContactMessage) -> Result<ContactMessage, Error> {
        let row = sqlx::query_as::<_, SqliteContactMessage>(
            r#"
            INSERT INTO contact_messages (id, name, email, subject, message, read, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)
            RETURNING *
            "#,
        )
        .bind(&message.id)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.created_at.timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to save contact message"))?;

        Ok(row.into())
    }

    async fn list(&self, page: Page) -> Result<Vec<ContactMessage>, Error> {
        let rows = sqlx::query_as::<_, SqliteContactMessage>(
            r#"
            SELECT * FROM contact_messages
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to list contact messages"))?;

        Ok(rows.into_iter().map(ContactMessage::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ContactMessage>, Error> {
        let row =
            sqlx::query_as::<_, SqliteContactMessage>("SELECT * FROM contact_messages WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error(e, "Failed to find contact message"))?;

        Ok(row.map(ContactMessage::from))
    }

    async fn set_read(&self, id: &str, read: bool) -> Result<ContactMessage, Error> {
        let row = sqlx::query_as::<_, SqliteContactMessage>(
            "UPDATE contact_messages SET read = ?2 WHERE id = ?1 RETURNING *",
        )
        .bind(id)
        .bind(read)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to update contact message"))?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to delete contact message"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound.into());
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to count contact messages"))?;
        Ok(count as u64)
    }

    async fn count_unread(&self) -> Result<u64, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages WHERE read = 0")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to count unread contact messages"))?;
        Ok(count as u64)
    }
}
