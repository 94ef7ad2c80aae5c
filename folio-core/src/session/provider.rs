use async_trait::async_trait;
use chrono::Duration;

use crate::{Error, Session, SessionToken, UserId};

/// Issues and validates session artifacts.
///
/// The access gate only ever calls [`SessionProvider::get_session`]; how a token is
/// checked is entirely the provider's business.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn create_session(
        &self,
        user_id: &UserId,
        user_agent: Option<String>,
        ip_address: Option<String>,
        duration: Duration,
    ) -> Result<Session, Error>;

    /// Return the session for `token`, or an error if it is invalid or expired.
    async fn get_session(&self, token: &SessionToken) -> Result<Session, Error>;

    /// Invalidate a token. A no-op for stateless providers.
    async fn delete_session(&self, token: &SessionToken) -> Result<(), Error>;
}
