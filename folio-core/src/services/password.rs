use std::sync::Arc;

use crate::{
    Error, User, UserId,
    error::AuthError,
    repositories::{PasswordRepository, UserRepository},
    validation::{FieldErrors, validate_password},
};

pub const PASSWORD_FIELDS_REQUIRED: &str = "All fields are required";
pub const INCORRECT_CURRENT_PASSWORD: &str = "Incorrect current password";

/// Password login and password changes for admin accounts.
pub struct PasswordService<U: UserRepository, P: PasswordRepository> {
    user_repository: Arc<U>,
    password_repository: Arc<P>,
}

impl<U: UserRepository, P: PasswordRepository> PasswordService<U, P> {
    pub fn new(user_repository: Arc<U>, password_repository: Arc<P>) -> Self {
        Self {
            user_repository,
            password_repository,
        }
    }

    /// Check an email and password pair.
    ///
    /// Unknown emails, accounts without a password and wrong passwords all fail with
    /// the same `InvalidCredentials` error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, Error> {
        let user = self
            .user_repository
            .find_by_email(email.trim())
            .await?
            .ok_or(Error::Auth(AuthError::InvalidCredentials))?;

        let hash = self
            .password_repository
            .password_hash(&user.id)
            .await?
            .ok_or(Error::Auth(AuthError::InvalidCredentials))?;

        if !verify_password(password, &hash) {
            return Err(Error::Auth(AuthError::InvalidCredentials));
        }

        Ok(user)
    }

    pub async fn change_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        let mut errors = FieldErrors::new();
        if current_password.is_empty() || new_password.is_empty() {
            errors.add("password", PASSWORD_FIELDS_REQUIRED);
            return Err(errors.into());
        }
        validate_password(new_password)?;

        let current_hash = self
            .password_repository
            .password_hash(user_id)
            .await?
            .ok_or(Error::Auth(AuthError::UserNotFound))?;

        if !verify_password(current_password, &current_hash) {
            errors.add("currentPassword", INCORRECT_CURRENT_PASSWORD);
            return Err(errors.into());
        }

        self.password_repository
            .store_password_hash(user_id, &hash_password(new_password))
            .await?;
        tracing::info!(user_id = %user_id, "Changed admin password");
        Ok(())
    }

    /// Set a password without knowing the old one. Used when provisioning accounts.
    pub async fn set_password(&self, user_id: &UserId, password: &str) -> Result<(), Error> {
        validate_password(password)?;
        self.password_repository
            .store_password_hash(user_id, &hash_password(password))
            .await
    }
}

fn hash_password(password: &str) -> String {
    password_auth::generate_hash(password)
}

fn verify_password(password: &str, hash: &str) -> bool {
    password_auth::verify_password(password, hash).is_ok()
}
