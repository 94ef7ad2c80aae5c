use async_trait::async_trait;
use chrono::Utc;
use folio_core::{
    Error, User, UserId, error::StorageError, repositories::UserRepository, user::NewUser,
};
use sqlx::SqlitePool;

use crate::{db_error, from_unix};

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteUser {
    id: String,
    email: String,
    name: Option<String>,
    role: String,
    locked_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl From<SqliteUser> for User {
    fn from(row: SqliteUser) -> Self {
        User {
            id: UserId::new(&row.id),
            email: row.email,
            name: row.name,
            role: row.role,
            locked_at: row.locked_at.map(from_unix),
            created_at: from_unix(row.created_at),
            updated_at: from_unix(row.updated_at),
        }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteUser>(
            r#"
            INSERT INTO users (id, email, name, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING *
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.role)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to create user"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, SqliteUser>("SELECT * FROM users WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to find user"))?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, SqliteUser>("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to find user by email"))?;

        Ok(row.map(User::from))
    }

    async fn update_account(&self, id: &UserId, name: &str, email: &str) -> Result<User, Error> {
        let row = sqlx::query_as::<_, SqliteUser>(
            r#"
            UPDATE users
            SET name = ?2, email = ?3, updated_at = ?4
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id.as_str())
        .bind(name)
        .bind(email)
        .bind(Utc::now().timestamp())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to update user"))?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    async fn count(&self) -> Result<u64, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to count users"))?;

        Ok(count as u64)
    }
}
