use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use serde::{Deserialize, Serialize};

use crate::message::build_message;
use crate::{Email, Mailer, MailerError};

/// How the connection to the relay is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmtpSecurity {
    /// Plaintext, only sensible for a local relay such as mailpit.
    None,
    #[default]
    StartTls,
    Tls,
}

impl std::str::FromStr for SmtpSecurity {
    type Err = MailerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "none" => Ok(SmtpSecurity::None),
            "starttls" => Ok(SmtpSecurity::StartTls),
            "tls" => Ok(SmtpSecurity::Tls),
            other => Err(MailerError::Config(format!(
                "MAILER_SMTP_TLS must be one of none, starttls, tls; got {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub security: SmtpSecurity,
}

impl SmtpSettings {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            username: None,
            password: None,
            security: SmtpSecurity::default(),
        }
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
            _ => None,
        }
    }
}

/// Delivers notifications through an SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpTransport {
    relay: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// Prepare a connection pool for the relay. No connection is opened until the first send.
    ///
    /// The pool spawns its maintenance task on the current tokio runtime, so this has to be
    /// called from inside one.
    pub fn connect(settings: &SmtpSettings) -> Result<Self, MailerError> {
        let host = settings.host.as_str();
        let mut relay = match settings.security {
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
            SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?,
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)?,
        };

        if let Some(port) = settings.port {
            relay = relay.port(port);
        }
        if let Some(credentials) = settings.credentials() {
            relay = relay.credentials(credentials);
        }

        tracing::debug!(host, security = ?settings.security, "SMTP relay configured");
        Ok(Self {
            relay: relay.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpTransport {
    async fn send_email(&self, email: Email) -> Result<(), MailerError> {
        let message = build_message(email)?;
        self.relay.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_with_credentials() {
        let settings = SmtpSettings {
            port: Some(587),
            username: Some("owner@example.com".to_string()),
            password: Some("password".to_string()),
            ..SmtpSettings::new("smtp.example.com")
        };
        assert!(SmtpTransport::connect(&settings).is_ok());
    }

    #[tokio::test]
    async fn test_plaintext_local_relay() {
        let settings = SmtpSettings {
            port: Some(1025),
            security: SmtpSecurity::None,
            ..SmtpSettings::new("localhost")
        };
        assert!(SmtpTransport::connect(&settings).is_ok());
    }

    #[test]
    fn test_security_parsing() {
        assert_eq!("TLS".parse::<SmtpSecurity>().unwrap(), SmtpSecurity::Tls);
        assert_eq!(
            "starttls".parse::<SmtpSecurity>().unwrap(),
            SmtpSecurity::StartTls
        );
        assert!(matches!(
            "ssl".parse::<SmtpSecurity>(),
            Err(MailerError::Config(_))
        ));
    }

    #[test]
    fn test_credentials_need_both_parts() {
        let settings = SmtpSettings {
            username: Some("owner".to_string()),
            ..SmtpSettings::new("smtp.example.com")
        };
        assert!(settings.credentials().is_none());
    }
}
