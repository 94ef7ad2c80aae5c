//! Lockout for the admin login.
//!
//! Failed password attempts are recorded per email. Once `max_failed_attempts` land
//! inside `lockout_period` the address is locked until the period has passed since the
//! most recent failure. A successful login clears the record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    Error,
    repositories::LoginAttemptRepository,
    storage::{AttemptStats, LockoutPolicy, LockoutStatus},
};

const CLEANUP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60 * 60);

pub struct LoginGuard<R: LoginAttemptRepository> {
    repository: Arc<R>,
    policy: LockoutPolicy,
}

impl<R: LoginAttemptRepository> LoginGuard<R> {
    pub fn new(repository: Arc<R>, policy: LockoutPolicy) -> Self {
        Self { repository, policy }
    }

    pub async fn lockout_status(&self, email: &str) -> Result<LockoutStatus, Error> {
        if !self.policy.enabled {
            return Ok(LockoutStatus::unlocked(email));
        }

        let now = Utc::now();
        let stats = self
            .repository
            .failure_stats(email, now - self.policy.lockout_period)
            .await?;

        Ok(self.lockout_status_at(email, &stats, now))
    }

    pub async fn is_locked(&self, email: &str) -> Result<bool, Error> {
        Ok(self.lockout_status(email).await?.is_locked)
    }

    /// Record a failure and return the status it leaves the address in.
    ///
    /// Emails without an account are tracked too, so a locked response does not reveal
    /// whether the address exists.
    pub async fn record_failure(
        &self,
        email: &str,
        ip_address: Option<&str>,
    ) -> Result<LockoutStatus, Error> {
        if !self.policy.enabled {
            return Ok(LockoutStatus::unlocked(email));
        }

        self.repository
            .record_failure(email, ip_address)
            .await?;

        let status = self.lockout_status(email).await?;
        if status.is_locked {
            tracing::warn!(
                email = %email,
                failed_attempts = status.failed_attempts,
                "Admin login locked after repeated failures"
            );
            self.repository
                .mark_locked(email, Some(Utc::now()))
                .await?;
        }

        Ok(status)
    }

    /// Forget the failures for `email`. Called after a successful login.
    pub async fn forget_failures(&self, email: &str) -> Result<(), Error> {
        self.repository.clear_failures(email).await?;
        self.repository.mark_locked(email, None).await
    }

    /// Periodically delete attempt records older than the retention period.
    ///
    /// The task stops when `shutdown` changes or its sender is dropped.
    pub fn start_cleanup_task(&self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let repository = Arc::clone(&self.repository);
        let retention = self.policy.retention_period;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        match repository.purge_before(Utc::now() - retention).await {
                            Ok(0) => {}
                            Ok(count) => {
                                tracing::info!(count, "Removed expired failed login attempts");
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Failed to remove expired login attempts");
                            }
                        }
                    }
                    _ = shutdown.changed() => {
                        tracing::debug!("Stopping login attempt cleanup task");
                        break;
                    }
                }
            }
        })
    }

    fn lockout_status_at(
        &self,
        email: &str,
        stats: &AttemptStats,
        now: DateTime<Utc>,
    ) -> LockoutStatus {
        if stats.count < self.policy.max_failed_attempts {
            return LockoutStatus {
                failed_attempts: stats.count,
                ..LockoutStatus::unlocked(email)
            };
        }

        let locked_until = stats
            .latest_at
            .map(|latest| latest + self.policy.lockout_period)
            .filter(|until| *until > now);

        LockoutStatus {
            email: email.to_string(),
            failed_attempts: stats.count,
            is_locked: locked_until.is_some(),
            locked_until,
        }
    }
}
