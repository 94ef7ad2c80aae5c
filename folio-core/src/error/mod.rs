pub mod utilities;

use thiserror::Error;

use crate::validation::FieldErrors;

/// Every failure the domain layer reports. The HTTP layer maps these onto status codes.
#[derive(Debug, Error)]
pub enum Error {
    #[error("auth: {0}")]
    Auth(#[from] AuthError),

    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("session: {0}")]
    Session(#[from] SessionError),

    #[error("crypto: {0}")]
    Crypto(#[from] CryptoError),

    /// The owner could not be notified. Never surfaced to the submitter.
    #[error("notification failed: {0}")]
    Notification(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email, missing password and wrong password all look the same.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("no such account")]
    UserNotFound,

    #[error("an account with this email exists")]
    UserAlreadyExists,

    #[error("too many failed logins, try again later")]
    AccountLocked,

    #[error("admin role required")]
    Forbidden,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("expired")]
    Expired,

    #[error("bad token ({0})")]
    InvalidToken(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("query failed: {0}")]
    Database(String),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("cannot connect: {0}")]
    Connection(String),

    #[error("not found")]
    NotFound,

    /// A unique index rejected the write, e.g. a duplicate slug.
    #[error("conflict on {0}")]
    Constraint(String),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("not an email address: {0}")]
    InvalidEmail(String),

    #[error("password too weak")]
    WeakPassword,

    #[error("{0}")]
    InvalidField(String),

    #[error("{0}")]
    MissingField(String),

    /// Per-field messages, rendered back next to each form input.
    #[error("{0}")]
    Fields(FieldErrors),
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("could not sign session: {0}")]
    JwtSigning(String),
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Error::Validation(ValidationError::Fields(errors))
    }
}

impl Error {
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::Auth(AuthError::InvalidCredentials)
                | Error::Auth(AuthError::UserNotFound)
                | Error::Auth(AuthError::UserAlreadyExists)
        )
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Storage(StorageError::NotFound))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Error::Storage(StorageError::Constraint(_)) | Error::Auth(AuthError::UserAlreadyExists)
        )
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    pub fn is_session_error(&self) -> bool {
        matches!(self, Error::Session(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let auth = Error::Auth(AuthError::InvalidCredentials);
        assert_eq!(auth.to_string(), "auth: invalid email or password");

        let missing = Error::Storage(StorageError::NotFound);
        assert_eq!(missing.to_string(), "storage: not found");

        let constraint = Error::Storage(StorageError::Constraint("projects.slug".to_string()));
        assert_eq!(constraint.to_string(), "storage: conflict on projects.slug");
    }

    #[test]
    fn test_field_errors_convert_to_validation() {
        let mut errors = FieldErrors::new();
        errors.add("title", "Title is required");
        let error: Error = errors.into();
        assert!(error.is_validation_error());
        assert_eq!(error.to_string(), "invalid input: title: Title is required");
    }

    #[test]
    fn test_classification() {
        assert!(Error::Storage(StorageError::NotFound).is_not_found());
        assert!(Error::Storage(StorageError::Constraint("x".into())).is_conflict());
        assert!(Error::Auth(AuthError::UserAlreadyExists).is_conflict());
        assert!(!Error::Auth(AuthError::AccountLocked).is_auth_error());
        assert!(Error::Session(SessionError::Expired).is_session_error());
        assert!(Error::Storage(StorageError::Database("x".into())).is_storage_error());
    }

    #[test]
    fn test_error_from_conversions() {
        let error: Error = ValidationError::WeakPassword.into();
        assert!(matches!(
            error,
            Error::Validation(ValidationError::WeakPassword)
        ));
    }
}
