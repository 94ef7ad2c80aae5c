use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{FieldErrors, Validated, clean_list, optional_text, required_text};

/// The site owner's public profile. There is at most one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub avatar: Option<String>,
    pub resume_url: Option<String>,
    pub skills: Vec<String>,
    pub socials: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    pub avatar: Option<String>,
    pub resume_url: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub socials: Option<serde_json::Value>,
}

impl ProfileInput {
    pub fn validate(self) -> Validated<Self> {
        let mut errors = FieldErrors::new();
        let name = required_text(&mut errors, "name", self.name, "Name is required");
        let title = required_text(&mut errors, "title", self.title, "Title is required");
        let bio = required_text(&mut errors, "bio", self.bio, "Bio is required");

        let socials = match self.socials {
            None | Some(serde_json::Value::Null) => None,
            Some(value @ serde_json::Value::Object(_)) => Some(value),
            Some(_) => {
                errors.add("socials", "Socials must be an object");
                None
            }
        };

        errors.into_result(Self {
            name,
            title,
            bio,
            avatar: optional_text(self.avatar),
            resume_url: optional_text(self.resume_url),
            skills: clean_list(self.skills),
            socials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_fields() {
        let errors = ProfileInput::default().validate().unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("title"));
        assert!(errors.contains("bio"));
    }

    #[test]
    fn test_socials_must_be_object() {
        let input: ProfileInput = serde_json::from_value(json!({
            "name": "Ada", "title": "Engineer", "bio": "Builds things",
            "socials": ["github"]
        }))
        .unwrap();
        assert!(input.validate().unwrap_err().contains("socials"));
    }

    #[test]
    fn test_cleans_optional_fields() {
        let input: ProfileInput = serde_json::from_value(json!({
            "name": " Ada ", "title": "Engineer", "bio": "Builds things",
            "avatar": "", "skills": ["Rust", " "],
            "socials": {"github": "https://github.com/ada"}
        }))
        .unwrap();
        let input = input.validate().unwrap();
        assert_eq!(input.name, "Ada");
        assert_eq!(input.avatar, None);
        assert_eq!(input.skills, vec!["Rust"]);
        assert!(input.socials.is_some());
    }
}
