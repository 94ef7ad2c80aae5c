use lettre::Message;
use lettre::message::{MultiPart, SinglePart};

use crate::{Email, MailerError};

/// Convert an [`Email`] into a lettre [`Message`] shared by every transport.
pub(crate) fn build_message(email: Email) -> Result<Message, MailerError> {
    let mut builder = Message::builder()
        .from(email.from.parse()?)
        .to(email.to.parse()?)
        .subject(email.subject);

    if let Some(reply_to) = email.reply_to {
        builder = builder.reply_to(reply_to.parse()?);
    }

    let message = match email.html_body {
        Some(html) => builder.multipart(MultiPart::alternative_plain_html(email.text_body, html))?,
        None => builder.singlepart(SinglePart::plain(email.text_body))?,
    };

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> Email {
        Email {
            from: "Portfolio Contact <site@example.com>".to_string(),
            to: "owner@example.com".to_string(),
            reply_to: Some("visitor@example.com".to_string()),
            subject: "[Portfolio] Hello".to_string(),
            text_body: "Name: Ada".to_string(),
            html_body: None,
        }
    }

    #[test]
    fn test_build_text_message() {
        let message = build_message(email()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Reply-To: visitor@example.com"));
        assert!(raw.contains("Subject: [Portfolio] Hello"));
    }

    #[test]
    fn test_html_alternative_is_multipart() {
        let mut email = email();
        email.html_body = Some("<p>Name: Ada</p>".to_string());
        let raw = String::from_utf8(build_message(email).unwrap().formatted()).unwrap();
        assert!(raw.contains("multipart/alternative"));
    }

    #[test]
    fn test_invalid_reply_to_is_an_address_error() {
        let mut email = email();
        email.reply_to = Some("not an address".to_string());
        assert!(matches!(build_message(email), Err(MailerError::Address(_))));
    }
}
