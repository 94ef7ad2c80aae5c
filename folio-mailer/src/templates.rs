//! Notification sent to the site owner for each accepted contact message.
use askama::Template;
use serde::{Deserialize, Serialize};

use crate::{Email, MailerConfig, MailerError};

/// The fields of a contact submission that end up in the owner's inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactNotification {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Template)]
#[template(
    source = "Name: {{ name }}\nEmail: {{ email }}\n\nMessage:\n{{ message }}",
    ext = "txt"
)]
struct ContactNotificationText<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{{ subject }}</title></head>
<body>
    <p><strong>Name:</strong> {{ name }}</p>
    <p><strong>Email:</strong> <a href="mailto:{{ email }}">{{ email }}</a></p>
    <p><strong>Message:</strong></p>
    <p style="white-space: pre-wrap;">{{ message }}</p>
</body>
</html>"#,
    ext = "html"
)]
struct ContactNotificationHtml<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

pub struct ContactNotificationEmail;

impl ContactNotificationEmail {
    /// Render the notification. Replies go straight back to the visitor.
    pub fn build(
        config: &MailerConfig,
        notification: &ContactNotification,
    ) -> Result<Email, MailerError> {
        let subject = format!("[{}] {}", config.site_name, notification.subject);

        let text_body = ContactNotificationText {
            name: &notification.name,
            email: &notification.email,
            message: &notification.message,
        }
        .render()?;

        let html_body = ContactNotificationHtml {
            name: &notification.name,
            email: &notification.email,
            subject: &subject,
            message: &notification.message,
        }
        .render()?;

        Email::builder()
            .from(config.get_from_address())
            .to(config.contact_email.clone())
            .reply_to(notification.email.clone())
            .subject(subject)
            .text_body(text_body)
            .html_body(html_body)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransportConfig;
    use std::path::PathBuf;

    fn config() -> MailerConfig {
        MailerConfig {
            transport: TransportConfig::File {
                output_dir: PathBuf::from("./emails"),
            },
            from_address: "site@example.com".to_string(),
            from_name: Some("Portfolio Contact".to_string()),
            contact_email: "owner@example.com".to_string(),
            site_name: "Portfolio".to_string(),
        }
    }

    fn notification() -> ContactNotification {
        ContactNotification {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "Loved the <b>blog</b>".to_string(),
        }
    }

    #[test]
    fn test_notification_headers() {
        let email = ContactNotificationEmail::build(&config(), &notification()).unwrap();
        assert_eq!(email.subject, "[Portfolio] Hello");
        assert_eq!(email.to, "owner@example.com");
        assert_eq!(email.reply_to.as_deref(), Some("ada@example.com"));
        assert_eq!(email.from, "Portfolio Contact <site@example.com>");
    }

    #[test]
    fn test_text_body_layout() {
        let email = ContactNotificationEmail::build(&config(), &notification()).unwrap();
        assert_eq!(
            email.text_body,
            "Name: Ada\nEmail: ada@example.com\n\nMessage:\nLoved the <b>blog</b>"
        );
    }

    #[test]
    fn test_html_body_escapes_message() {
        let email = ContactNotificationEmail::build(&config(), &notification()).unwrap();
        let html = email.html_body.unwrap();
        assert!(html.contains("Loved the &lt;b&gt;blog&lt;/b&gt;"));
    }
}
