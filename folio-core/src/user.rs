//! Admin accounts.
//!
//! | Field        | Type               | Description                                      |
//! | ------------ | ------------------ | ------------------------------------------------ |
//! | `id`         | `UserId`           | Opaque `usr_` identifier.                         |
//! | `email`      | `String`           | Login email, unique.                              |
//! | `name`       | `Option<String>`   | Display name.                                     |
//! | `role`       | `String`           | Authorization role, `admin` unless set otherwise. |
//! | `locked_at`  | `Option<DateTime>` | Set while login is locked after failed attempts.  |
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{generate_prefixed_id, validate_prefixed_id};

pub const ADMIN_ROLE: &str = "admin";
const USER_ID_PREFIX: &str = "usr";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: &str) -> Self {
        UserId(id.to_owned())
    }

    pub fn new_random() -> Self {
        UserId(generate_prefixed_id(USER_ID_PREFIX))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        validate_prefixed_id(&self.0, USER_ID_PREFIX)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    #[serde(skip_serializing)]
    pub locked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// Name shown in the admin UI, falling back to the email like the login callback does.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Everything needed to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
}

impl NewUser {
    pub fn admin(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: UserId::new_random(),
            email: email.into(),
            name,
            role: ADMIN_ROLE.to_owned(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// The stored account as a backend without its own clock would return it.
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            locked_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_admin() {
        let user = NewUser::admin("admin@example.com", None).into_user(Utc::now());
        assert!(user.is_admin());
        assert!(user.id.is_valid());
        assert!(user.locked_at.is_none());
        assert_eq!(user.display_name(), "admin@example.com");
    }

    #[test]
    fn test_editor_is_not_admin() {
        let user = NewUser::admin("e@example.com", Some("Ed".to_string()))
            .with_role("editor")
            .into_user(Utc::now());
        assert!(!user.is_admin());
        assert_eq!(user.display_name(), "Ed");
    }

    #[test]
    fn test_id_display_and_serde() {
        let id = UserId::new("usr_abc");
        assert_eq!(id.to_string(), "usr_abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"usr_abc\"");
        assert!(!UserId::new("abc").is_valid());
    }
}
