use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio::{Error, FieldErrors};
use folio_core::error::{AuthError, StorageError, ValidationError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Conflict(&'static str),

    #[error("Too many login attempts")]
    TooManyAttempts,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(ValidationError::Fields(errors)) => ApiError::Validation(errors),
            Error::Validation(ValidationError::InvalidEmail(_)) => {
                let mut errors = FieldErrors::new();
                errors.add("email", "Invalid email address");
                ApiError::Validation(errors)
            }
            Error::Validation(ValidationError::WeakPassword) => {
                let mut errors = FieldErrors::new();
                errors.add("newPassword", "Password is too weak");
                ApiError::Validation(errors)
            }
            Error::Validation(e) => ApiError::BadRequest(e.to_string()),
            Error::Storage(StorageError::NotFound) => ApiError::NotFound,
            Error::Storage(StorageError::Constraint(_)) => ApiError::Conflict("Slug must be unique"),
            Error::Auth(AuthError::InvalidCredentials) => ApiError::InvalidCredentials,
            Error::Auth(AuthError::UserNotFound) => ApiError::NotFound,
            Error::Auth(AuthError::UserAlreadyExists) => ApiError::Conflict("Email already in use"),
            Error::Auth(AuthError::AccountLocked) => ApiError::TooManyAttempts,
            Error::Auth(AuthError::Forbidden) => ApiError::Forbidden,
            Error::Session(_) => ApiError::Unauthorized,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to clients. Internal details stay in the logs.
    pub fn public_message(&self) -> &str {
        match self {
            ApiError::Validation(_) => "Please fix the errors below.",
            ApiError::BadRequest(msg) => msg,
            ApiError::InvalidCredentials => "Invalid email or password",
            ApiError::Unauthorized => "Unauthorized",
            ApiError::Forbidden => "Forbidden",
            ApiError::NotFound => "Not found",
            ApiError::Conflict(msg) => msg,
            ApiError::TooManyAttempts => "Too many login attempts. Please try again later.",
            ApiError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let ApiError::Internal(ref detail) = self {
            tracing::error!(error = %detail, "Request failed");
        }

        let body = match self {
            ApiError::Validation(ref errors) => json!({
                "error": self.public_message(),
                "code": status.as_u16(),
                "fields": errors,
            }),
            _ => json!({
                "error": self.public_message(),
                "code": status.as_u16(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_statuses() {
        let cases = [
            (Error::Storage(StorageError::NotFound), StatusCode::NOT_FOUND),
            (
                Error::Storage(StorageError::Constraint("UNIQUE".into())),
                StatusCode::CONFLICT,
            ),
            (
                Error::Storage(StorageError::Database("disk".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                Error::Auth(AuthError::AccountLocked),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                Error::Auth(AuthError::InvalidCredentials),
                StatusCode::UNAUTHORIZED,
            ),
            (
                Error::Session(folio_core::error::SessionError::Expired),
                StatusCode::UNAUTHORIZED,
            ),
            (
                Error::Validation(ValidationError::WeakPassword),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = ApiError::from(Error::Storage(StorageError::Database(
            "no such table: projects".into(),
        )));
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_conflict_messages() {
        let slug = ApiError::from(Error::Storage(StorageError::Constraint("slug".into())));
        assert_eq!(slug.public_message(), "Slug must be unique");

        let email = ApiError::from(Error::Auth(AuthError::UserAlreadyExists));
        assert_eq!(email.public_message(), "Email already in use");
    }
}
