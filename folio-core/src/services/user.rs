use std::sync::Arc;

use crate::{
    Error, User, UserId,
    error::{AuthError, utilities::FoundExt},
    repositories::UserRepository,
    user::NewUser,
    validation::{FieldErrors, is_valid_email, validate_email},
};

pub const ACCOUNT_FIELDS_REQUIRED: &str = "Name and email are required";

/// Admin account management.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create an admin account. Fails with `UserAlreadyExists` if the email is taken.
    pub async fn create_admin(&self, email: &str, name: Option<String>) -> Result<User, Error> {
        let email = email.trim();
        validate_email(email)?;

        if self.repository.find_by_email(email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        self.repository.create(NewUser::admin(email, name)).await
    }

    pub async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, Error> {
        self.repository.find_by_id(user_id).await
    }

    /// Change the display name and login email of an account.
    pub async fn update_account(
        &self,
        user_id: &UserId,
        name: &str,
        email: &str,
    ) -> Result<User, Error> {
        let (name, email) = (name.trim(), email.trim());

        let mut errors = FieldErrors::new();
        if name.is_empty() || email.is_empty() {
            errors.add("account", ACCOUNT_FIELDS_REQUIRED);
        } else if !is_valid_email(email) {
            errors.add("email", "Invalid email address");
        }
        errors.into_result(())?;

        // make sure the account still exists before touching it
        self.repository.find_by_id(user_id).await.or_not_found()?;

        if let Some(other) = self.repository.find_by_email(email).await?
            && other.id != *user_id
        {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let user = self.repository.update_account(user_id, name, email).await?;
        tracing::info!(user_id = %user.id, "Updated admin account");
        Ok(user)
    }

    pub async fn count_users(&self) -> Result<u64, Error> {
        self.repository.count().await
    }
}
