use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{
    Error,
    repositories::LoginAttemptRepository,
    storage::{AttemptStats, FailedLogin},
};
use sqlx::SqlitePool;

use crate::{db_error, from_unix};

pub struct SqliteLoginAttemptRepository {
    pool: SqlitePool,
}

impl SqliteLoginAttemptRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FailedLoginRow {
    id: i64,
    email: String,
    ip_address: Option<String>,
    attempted_at: i64,
}

impl From<FailedLoginRow> for FailedLogin {
    fn from(row: FailedLoginRow) -> Self {
        FailedLogin {
            id: row.id,
            email: row.email,
            ip_address: row.ip_address,
            attempted_at: from_unix(row.attempted_at),
        }
    }
}

#[async_trait]
impl LoginAttemptRepository for SqliteLoginAttemptRepository {
    async fn record_failure(
        &self,
        email: &str,
        ip_address: Option<&str>,
    ) -> Result<FailedLogin, Error> {
        let row = sqlx::query_as::<_, FailedLoginRow>(
            r#"
            INSERT INTO failed_login_attempts (email, ip_address, attempted_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, email, ip_address, attempted_at
            "#,
        )
        .bind(email)
        .bind(ip_address)
        .bind(Utc::now().timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to record failed login attempt"))?;

        Ok(row.into())
    }

    async fn failure_stats(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> Result<AttemptStats, Error> {
        let (count, latest_at): (i64, Option<i64>) = sqlx::query_as(
            r#"
            SELECT COUNT(*), MAX(attempted_at)
            FROM failed_login_attempts
            WHERE email = ?1 AND attempted_at >= ?2
            "#,
        )
        .bind(email)
        .bind(since.timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to get attempt stats"))?;

        Ok(AttemptStats {
            count: count as u32,
            latest_at: latest_at.map(from_unix),
        })
    }

    async fn clear_failures(&self, email: &str) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM failed_login_attempts WHERE email = ?1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to clear attempts"))?;

        Ok(result.rows_affected())
    }

    async fn purge_before(&self, before: DateTime<Utc>) -> Result<u64, Error> {
        // attempts of a currently locked account stay, they define the lock
        let result = sqlx::query(
            r#"
            DELETE FROM failed_login_attempts
            WHERE attempted_at < ?1
            AND email NOT IN (SELECT email FROM users WHERE locked_at IS NOT NULL)
            "#,
        )
        .bind(before.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to cleanup old attempts"))?;

        Ok(result.rows_affected())
    }

    async fn mark_locked(&self, email: &str, locked_at: Option<DateTime<Utc>>) -> Result<(), Error> {
        // unknown emails are a silent no-op
        sqlx::query("UPDATE users SET locked_at = ?1 WHERE email = ?2")
            .bind(locked_at.map(|at| at.timestamp()))
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to set locked_at"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_test_db;
    use chrono::Duration;

    async fn create_test_user(pool: &SqlitePool, email: &str) {
        sqlx::query("INSERT INTO users (id, email, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(format!("usr_{email}"))
            .bind(email)
            .bind(Utc::now().timestamp())
            .bind(Utc::now().timestamp())
            .execute(pool)
            .await
            .expect("Failed to create test user");
    }

    #[tokio::test]
    async fn test_record_failure() {
        let repo = SqliteLoginAttemptRepository::new(setup_test_db().await);

        let attempt = repo
            .record_failure("admin@example.com", Some("10.0.0.1"))
            .await
            .expect("Failed to record attempt");

        assert_eq!(attempt.email, "admin@example.com");
        assert_eq!(attempt.ip_address.as_deref(), Some("10.0.0.1"));
        assert!(attempt.id > 0);
    }

    #[tokio::test]
    async fn test_failure_stats_respects_since() {
        let repo = SqliteLoginAttemptRepository::new(setup_test_db().await);

        for _ in 0..3 {
            repo.record_failure("admin@example.com", None)
                .await
                .unwrap();
        }

        let stats = repo
            .failure_stats("admin@example.com", Utc::now() - Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(stats.count, 3);
        assert!(stats.latest_at.is_some());

        let stats = repo
            .failure_stats("admin@example.com", Utc::now() + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(stats.count, 0);
        assert!(stats.latest_at.is_none());
    }

    #[tokio::test]
    async fn test_clear_failures_only_touches_one_email() {
        let repo = SqliteLoginAttemptRepository::new(setup_test_db().await);

        repo.record_failure("a@example.com", None).await.unwrap();
        repo.record_failure("a@example.com", None).await.unwrap();
        repo.record_failure("b@example.com", None).await.unwrap();

        assert_eq!(repo.clear_failures("a@example.com").await.unwrap(), 2);

        let since = Utc::now() - Duration::hours(1);
        assert_eq!(repo.failure_stats("b@example.com", since).await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_cleanup_keeps_locked_accounts() {
        let pool = setup_test_db().await;
        create_test_user(&pool, "locked@example.com").await;
        let repo = SqliteLoginAttemptRepository::new(pool);

        repo.record_failure("locked@example.com", None).await.unwrap();
        repo.record_failure("other@example.com", None).await.unwrap();
        repo.mark_locked("locked@example.com", Some(Utc::now()))
            .await
            .unwrap();

        let removed = repo
            .purge_before(Utc::now() + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let since = Utc::now() - Duration::hours(1);
        assert_eq!(
            repo.failure_stats("locked@example.com", since).await.unwrap().count,
            1
        );
    }

    #[tokio::test]
    async fn test_mark_locked_unknown_email_is_noop() {
        let repo = SqliteLoginAttemptRepository::new(setup_test_db().await);
        repo.mark_locked("nobody@example.com", Some(Utc::now()))
            .await
            .unwrap();
    }
}
