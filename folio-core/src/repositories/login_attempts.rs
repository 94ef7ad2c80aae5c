use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    Error,
    storage::{AttemptStats, FailedLogin},
};

#[async_trait]
pub trait LoginAttemptRepository: Send + Sync + 'static {
    async fn record_failure(
        &self,
        email: &str,
        ip_address: Option<&str>,
    ) -> Result<FailedLogin, Error>;

    /// Count and latest timestamp of failures for `email` at or after `since`.
    async fn failure_stats(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> Result<AttemptStats, Error>;

    async fn clear_failures(&self, email: &str) -> Result<u64, Error>;

    /// Delete attempts older than `before`, keeping those for locked accounts.
    async fn purge_before(&self, before: DateTime<Utc>) -> Result<u64, Error>;

    async fn mark_locked(&self, email: &str, locked_at: Option<DateTime<Utc>>) -> Result<(), Error>;
}
