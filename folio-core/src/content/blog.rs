use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{FieldErrors, Validated, clean_list, optional_text, required_text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub read_time: Option<i64>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_published() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_published")]
    pub published: bool,
    pub read_time: Option<i64>,
}

impl Default for BlogPostInput {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            excerpt: None,
            content: String::new(),
            cover_image: None,
            tags: Vec::new(),
            published: default_published(),
            read_time: None,
        }
    }
}

impl BlogPostInput {
    pub fn validate(self) -> Validated<Self> {
        let mut errors = FieldErrors::new();
        let title = required_text(&mut errors, "title", self.title, "Title is required");
        let slug = required_text(&mut errors, "slug", self.slug, "Slug is required");
        let content = required_text(&mut errors, "content", self.content, "Content is required");

        if matches!(self.read_time, Some(minutes) if minutes < 0) {
            errors.add("readTime", "Read time cannot be negative");
        }

        errors.into_result(Self {
            title,
            slug,
            excerpt: optional_text(self.excerpt),
            content,
            cover_image: optional_text(self.cover_image),
            tags: clean_list(self.tags),
            published: self.published,
            read_time: self.read_time,
        })
    }
}

/// Admin listings see drafts, public listings do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogFilter {
    #[default]
    All,
    PublishedOnly,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_published_by_default() {
        let input: BlogPostInput =
            serde_json::from_value(json!({"title": "Hi", "slug": "hi", "content": "Body"}))
                .unwrap();
        assert!(input.validate().unwrap().published);
    }

    #[test]
    fn test_content_required() {
        let input = BlogPostInput {
            title: "Hi".into(),
            slug: "hi".into(),
            ..BlogPostInput::default()
        };
        assert_eq!(
            input.validate().unwrap_err().get("content").unwrap(),
            ["Content is required"]
        );
    }

    #[test]
    fn test_negative_read_time() {
        let input = BlogPostInput {
            title: "Hi".into(),
            slug: "hi".into(),
            content: "Body".into(),
            read_time: Some(-3),
            ..BlogPostInput::default()
        };
        assert!(input.validate().unwrap_err().contains("readTime"));
    }
}
