//! Input validation shared by the contact form and the admin API.
//!
//! Per-field problems are collected into [`FieldErrors`] so a form can show every
//! message at once; [`Validated`] is the tagged result carrying either the cleaned
//! value or those errors.
use crate::error::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Invalid email regex pattern")
});

/// Field name to the list of messages for that field. Ordered for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

/// Either the validated value or the per-field messages explaining why not.
pub type Validated<T> = Result<T, FieldErrors>;

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Finish a validation pass: `Ok(value)` if nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Validated<T> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Validates an email address
///
/// ```rust
/// use folio_core::validation::validate_email;
///
/// assert!(validate_email("user@example.com").is_ok());
/// assert!(validate_email("invalid-email").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::MissingField(
            "Email is required".to_string(),
        ));
    }

    if email.len() > 254 {
        return Err(ValidationError::InvalidEmail(
            "Email is too long".to_string(),
        ));
    }

    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(format!(
            "Invalid email format: {email}"
        )))
    }
}

/// Validates a password: 8 to 128 characters and not only whitespace.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::MissingField(
            "Password is required".to_string(),
        ));
    }

    let length = password.chars().count();
    if !(8..=128).contains(&length) {
        return Err(ValidationError::WeakPassword);
    }

    Ok(())
}

/// Trim a required text field, recording `message` when it ends up empty.
pub fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: String,
    message: &str,
) -> String {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        errors.add(field, message);
    }
    trimmed
}

/// Trim an optional text field. Blank strings become `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Optional absolute URL. Blank becomes `None`, anything unparsable is a field error.
pub fn optional_url(errors: &mut FieldErrors, field: &str, value: Option<String>) -> Option<String> {
    let value = optional_text(value)?;
    match url::Url::parse(&value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(value),
        _ => {
            errors.add(field, "Invalid url");
            None
        }
    }
}

/// Trim every entry and drop the blank ones.
pub fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("a@x.co").is_ok());
        assert!(matches!(
            validate_email(""),
            Err(ValidationError::MissingField(_))
        ));
        assert!(matches!(
            validate_email("nope"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(!is_valid_email(&format!("{}@example.com", "a".repeat(250))));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("changeme").is_ok());
        assert!(matches!(
            validate_password("short"),
            Err(ValidationError::WeakPassword)
        ));
        assert!(matches!(
            validate_password("        "),
            Err(ValidationError::MissingField(_))
        ));
    }

    #[test]
    fn test_field_errors_collect_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("email", "Invalid email address");
        errors.add("name", "Name is required");
        errors.add("name", "Name is too long");

        assert_eq!(errors.get("name").unwrap().len(), 2);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "name"]);
        assert!(errors.clone().into_result(()).is_err());

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["email"][0], "Invalid email address");
    }

    #[test]
    fn test_empty_field_errors_pass_value_through() {
        assert_eq!(FieldErrors::new().into_result(7), Ok(7));
    }

    #[test]
    fn test_optional_url() {
        let mut errors = FieldErrors::new();
        assert_eq!(optional_url(&mut errors, "liveUrl", Some(" ".into())), None);
        assert_eq!(
            optional_url(&mut errors, "liveUrl", Some("https://x.dev".into())),
            Some("https://x.dev".to_string())
        );
        assert!(errors.is_empty());

        assert_eq!(optional_url(&mut errors, "githubUrl", Some("github".into())), None);
        assert!(errors.contains("githubUrl"));
    }

    #[test]
    fn test_clean_list() {
        assert_eq!(
            clean_list(vec![" rust ".into(), "".into(), "axum".into()]),
            vec!["rust", "axum"]
        );
    }
}
