//! Records and settings for the admin login lockout.
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One failed admin login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedLogin {
    pub id: i64,
    pub email: String,
    pub ip_address: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

/// Failures for one email inside the lockout window.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttemptStats {
    pub count: u32,
    pub latest_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LockoutStatus {
    pub email: String,
    pub failed_attempts: u32,
    pub is_locked: bool,
    pub locked_until: Option<DateTime<Utc>>,
}

impl LockoutStatus {
    pub fn unlocked(email: &str) -> Self {
        Self {
            email: email.to_string(),
            failed_attempts: 0,
            is_locked: false,
            locked_until: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    pub enabled: bool,
    /// Failures inside `lockout_period` that lock the account
    pub max_failed_attempts: u32,
    pub lockout_period: Duration,
    /// How long attempt records are kept before the cleanup task removes them
    pub retention_period: Duration,
}

impl LockoutPolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_failed_attempts: 5,
            lockout_period: Duration::minutes(15),
            retention_period: Duration::days(7),
        }
    }
}
