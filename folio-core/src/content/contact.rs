use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_prefixed_id;

/// A message left through the public contact form.
///
/// Each row doubles as the submission record the rate limiter counts, keyed by `email`
/// and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl NewContactMessage {
    pub fn new(name: String, email: String, subject: String, message: String) -> Self {
        Self {
            id: generate_prefixed_id("msg"),
            name,
            email,
            subject,
            message,
            created_at: Utc::now(),
        }
    }
}
