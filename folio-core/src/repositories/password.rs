use async_trait::async_trait;

use crate::{Error, UserId};

/// Password hashes live apart from the user row so account listings never load them.
#[async_trait]
pub trait PasswordRepository: Send + Sync + 'static {
    /// Insert or replace the hash for `user_id`.
    async fn store_password_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error>;

    async fn password_hash(&self, user_id: &UserId) -> Result<Option<String>, Error>;
}
