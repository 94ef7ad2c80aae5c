use crate::{
    Error,
    error::{StorageError, ValidationError},
};

/// Turns `None` into [`ValidationError::MissingField`] while building a record.
pub trait RequiredFieldExt<T> {
    fn require_field(self, field_name: &str) -> Result<T, ValidationError>;
}

impl<T> RequiredFieldExt<T> for Option<T> {
    fn require_field(self, field_name: &str) -> Result<T, ValidationError> {
        self.ok_or_else(|| ValidationError::MissingField(format!("{field_name} is required")))
    }
}

/// Turns a missing row into [`StorageError::NotFound`].
///
/// ```rust,ignore
/// let project = repository.find_by_slug(slug).await.or_not_found()?;
/// ```
pub trait FoundExt<T> {
    fn or_not_found(self) -> Result<T, Error>;
}

impl<T> FoundExt<T> for Result<Option<T>, Error> {
    fn or_not_found(self) -> Result<T, Error> {
        self?.ok_or(Error::Storage(StorageError::NotFound))
    }
}
