use serde::{Deserialize, Serialize};

use crate::MailerError;

/// A rendered message with a single recipient, ready for any [`Mailer`](crate::Mailer).
///
/// Every message carries a plain-text body; the HTML alternative is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

impl Email {
    pub fn builder() -> EmailBuilder {
        EmailBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct EmailBuilder {
    from: Option<String>,
    to: Option<String>,
    reply_to: Option<String>,
    subject: Option<String>,
    text_body: Option<String>,
    html_body: Option<String>,
}

impl EmailBuilder {
    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to = Some(address.into());
        self
    }

    /// Where replies from the recipient's mail client should go.
    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn text_body(mut self, text: impl Into<String>) -> Self {
        self.text_body = Some(text.into());
        self
    }

    pub fn html_body(mut self, html: impl Into<String>) -> Self {
        self.html_body = Some(html.into());
        self
    }

    pub fn build(self) -> Result<Email, MailerError> {
        Ok(Email {
            from: required(self.from, "from")?,
            to: required(self.to, "to")?,
            reply_to: self.reply_to.filter(|r| !r.trim().is_empty()),
            subject: required(self.subject, "subject")?,
            text_body: required(self.text_body, "text body")?,
            html_body: self.html_body,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, MailerError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(MailerError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_builder() {
        let email = Email::builder()
            .from("site@example.com")
            .to("owner@example.com")
            .reply_to("visitor@example.com")
            .subject("[Portfolio] Hello")
            .text_body("Hi there")
            .build()
            .unwrap();

        assert_eq!(email.from, "site@example.com");
        assert_eq!(email.to, "owner@example.com");
        assert_eq!(email.reply_to.as_deref(), Some("visitor@example.com"));
        assert_eq!(email.text_body, "Hi there");
        assert!(email.html_body.is_none());
    }

    #[test]
    fn test_missing_recipient_is_rejected() {
        let result = Email::builder()
            .from("site@example.com")
            .subject("Test")
            .text_body("body")
            .build();

        assert!(matches!(result, Err(MailerError::MissingField("to"))));
    }

    #[test]
    fn test_blank_text_body_is_rejected() {
        let result = Email::builder()
            .from("site@example.com")
            .to("owner@example.com")
            .subject("Test")
            .text_body("   ")
            .html_body("<p>only html</p>")
            .build();

        assert!(matches!(result, Err(MailerError::MissingField("text body"))));
    }

    #[test]
    fn test_blank_reply_to_is_dropped() {
        let email = Email::builder()
            .from("site@example.com")
            .to("owner@example.com")
            .reply_to("")
            .subject("Test")
            .text_body("body")
            .build()
            .unwrap();

        assert!(email.reply_to.is_none());
    }
}
