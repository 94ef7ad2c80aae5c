//! Admin sessions.
//!
//! A session is a signed JWT (HS256) carried in the `folio_session` cookie or an
//! `Authorization: Bearer` header. Validation is stateless: any token whose signature
//! and expiry check out is a session.

pub mod jwt;
pub mod provider;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

pub use jwt::{JwtConfig, JwtSessionProvider};
pub use provider::SessionProvider;

/// Minimum HS256 secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// The opaque credential presented by a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        SessionToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        SessionToken(token)
    }
}

/// An authenticated admin session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
    /// User agent that logged in, when recorded.
    pub user_agent: Option<String>,
    /// Client address that logged in, when recorded.
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session for `user_id` starting at `now`. The token stays empty until a provider signs it.
    pub fn starting_at(user_id: UserId, now: DateTime<Utc>, lifetime: Duration) -> Self {
        Session {
            token: SessionToken::new(String::new()),
            user_id,
            user_agent: None,
            ip_address: None,
            created_at: now,
            expires_at: now + lifetime,
        }
    }

    pub fn with_client(mut self, user_agent: Option<String>, ip_address: Option<String>) -> Self {
        self.user_agent = user_agent;
        self.ip_address = ip_address;
        self
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let session = Session::starting_at(UserId::new_random(), now, Duration::hours(1));

        assert!(!session.is_expired_at(now));
        assert!(!session.is_expired_at(now + Duration::minutes(59)));
        assert!(session.is_expired_at(now + Duration::hours(1)));
    }

    #[test]
    fn test_token_serializes_as_plain_string() {
        let token = SessionToken::new("abc.def.ghi");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"abc.def.ghi\"");
        assert_eq!(token.as_str(), "abc.def.ghi");
    }
}
