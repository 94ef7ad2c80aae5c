use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{
    FieldErrors, Validated, clean_list, optional_text, optional_url, required_text,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub tech_stack: Vec<String>,
    pub featured: bool,
    pub is_personal: bool,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create and update payload for a project.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub is_personal: bool,
    #[serde(default)]
    pub order: i64,
}

impl ProjectInput {
    pub fn validate(self) -> Validated<Self> {
        let mut errors = FieldErrors::new();
        let title = required_text(&mut errors, "title", self.title, "Title is required");
        let slug = required_text(&mut errors, "slug", self.slug, "Slug is required");
        let github_url = optional_url(&mut errors, "githubUrl", self.github_url);
        let live_url = optional_url(&mut errors, "liveUrl", self.live_url);

        errors.into_result(Self {
            title,
            slug,
            summary: optional_text(self.summary),
            description: optional_text(self.description),
            content: optional_text(self.content),
            image: optional_text(self.image),
            github_url,
            live_url,
            tech_stack: clean_list(self.tech_stack),
            featured: self.featured,
            is_personal: self.is_personal,
            order: self.order,
        })
    }
}

/// Narrows a project listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub featured: Option<bool>,
    pub is_personal: Option<bool>,
}

impl ProjectFilter {
    pub fn featured() -> Self {
        Self {
            featured: Some(true),
            ..Self::default()
        }
    }

    pub fn personal() -> Self {
        Self {
            is_personal: Some(true),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_and_slug_required() {
        let errors = ProjectInput::default().validate().unwrap_err();
        assert_eq!(errors.get("title").unwrap(), ["Title is required"]);
        assert_eq!(errors.get("slug").unwrap(), ["Slug is required"]);
    }

    #[test]
    fn test_empty_urls_become_none() {
        let input: ProjectInput = serde_json::from_value(json!({
            "title": "Folio", "slug": "folio", "githubUrl": "", "liveUrl": "https://folio.dev",
            "techStack": ["Rust", ""]
        }))
        .unwrap();
        let input = input.validate().unwrap();
        assert_eq!(input.github_url, None);
        assert_eq!(input.live_url.as_deref(), Some("https://folio.dev"));
        assert_eq!(input.tech_stack, vec!["Rust"]);
    }

    #[test]
    fn test_bad_url_rejected() {
        let input = ProjectInput {
            title: "Folio".into(),
            slug: "folio".into(),
            live_url: Some("folio dot dev".into()),
            ..ProjectInput::default()
        };
        assert!(input.validate().unwrap_err().contains("liveUrl"));
    }
}
