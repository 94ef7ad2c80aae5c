use crate::{Error, User, UserId, user::NewUser};
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Insert a user. A taken email is a [`crate::error::StorageError::Constraint`].
    async fn create(&self, user: NewUser) -> Result<User, Error>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error>;

    /// Change name and email. Missing users are [`crate::error::StorageError::NotFound`].
    async fn update_account(
        &self,
        id: &UserId,
        name: &str,
        email: &str,
    ) -> Result<User, Error>;

    async fn count(&self) -> Result<u64, Error>;
}
