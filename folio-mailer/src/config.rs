use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::transports::{SmtpSecurity, SmtpSettings};
use crate::{FileTransport, Mailer, MailerError, SmtpTransport};

const DEFAULT_FROM_ADDRESS: &str = "noreply@example.com";
const DEFAULT_FROM_NAME: &str = "Portfolio Contact";
const DEFAULT_SITE_NAME: &str = "Portfolio";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    pub transport: TransportConfig,
    pub from_address: String,
    pub from_name: Option<String>,
    /// Where contact form notifications are delivered.
    pub contact_email: String,
    /// Prefix used in notification subjects, e.g. `[Portfolio] Hello`.
    pub site_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportConfig {
    Smtp(SmtpSettings),
    /// Writes each message as an `.eml` file, for development.
    File { output_dir: PathBuf },
}

impl MailerConfig {
    /// Read mailer settings from `MAILER_*` and `CONTACT_EMAIL`.
    ///
    /// Returns `Ok(None)` when neither `MAILER_SMTP_HOST` nor `MAILER_FILE_OUTPUT_DIR` is
    /// set; notifications are then unconfigured.
    pub fn from_env() -> Result<Option<Self>, MailerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`MailerConfig::from_env`] but reading from an arbitrary source.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, MailerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let transport = match (lookup("MAILER_SMTP_HOST"), lookup("MAILER_FILE_OUTPUT_DIR")) {
            (Some(host), _) => TransportConfig::Smtp(smtp_settings(host, &lookup)?),
            (None, Some(output_dir)) => TransportConfig::File {
                output_dir: PathBuf::from(output_dir),
            },
            (None, None) => return Ok(None),
        };

        let from_address =
            lookup("MAILER_FROM_ADDRESS").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string());

        Ok(Some(Self {
            transport,
            contact_email: lookup("CONTACT_EMAIL").unwrap_or_else(|| from_address.clone()),
            from_address,
            from_name: Some(
                lookup("MAILER_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            ),
            site_name: lookup("MAILER_SITE_NAME").unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
        }))
    }

    pub fn build_transport(&self) -> Result<Box<dyn Mailer>, MailerError> {
        Ok(match &self.transport {
            TransportConfig::Smtp(settings) => Box::new(SmtpTransport::connect(settings)?),
            TransportConfig::File { output_dir } => Box::new(FileTransport::new(output_dir)?),
        })
    }

    /// The `From` header, with the display name when one is set.
    pub fn get_from_address(&self) -> String {
        match &self.from_name {
            Some(name) => format!("{name} <{}>", self.from_address),
            None => self.from_address.clone(),
        }
    }
}

fn smtp_settings<F>(host: String, lookup: &F) -> Result<SmtpSettings, MailerError>
where
    F: Fn(&str) -> Option<String>,
{
    let port = lookup("MAILER_SMTP_PORT")
        .map(|p| {
            p.parse::<u16>()
                .map_err(|_| MailerError::Config(format!("MAILER_SMTP_PORT is not a valid port: {p}")))
        })
        .transpose()?;
    let security = lookup("MAILER_SMTP_TLS")
        .map(|t| t.parse::<SmtpSecurity>())
        .transpose()?
        .unwrap_or_default();

    Ok(SmtpSettings {
        host,
        port,
        username: lookup("MAILER_SMTP_USERNAME"),
        password: lookup("MAILER_SMTP_PASSWORD"),
        security,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_unconfigured_without_host_or_dir() {
        let config = MailerConfig::from_lookup(lookup(&[("MAILER_FROM_ADDRESS", "a@b.co")]))
            .unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_smtp_config() {
        let config = MailerConfig::from_lookup(lookup(&[
            ("MAILER_SMTP_HOST", "smtp.example.com"),
            ("MAILER_SMTP_PORT", "2525"),
            ("MAILER_SMTP_TLS", "tls"),
            ("MAILER_FROM_ADDRESS", "site@example.com"),
            ("CONTACT_EMAIL", "owner@example.com"),
        ]))
        .unwrap()
        .unwrap();

        match &config.transport {
            TransportConfig::Smtp(settings) => {
                assert_eq!(settings.host, "smtp.example.com");
                assert_eq!(settings.port, Some(2525));
                assert_eq!(settings.security, SmtpSecurity::Tls);
            }
            _ => panic!("Expected smtp transport"),
        }
        assert_eq!(config.contact_email, "owner@example.com");
        assert_eq!(
            config.get_from_address(),
            "Portfolio Contact <site@example.com>"
        );
    }

    #[test]
    fn test_contact_email_defaults_to_sender() {
        let config = MailerConfig::from_lookup(lookup(&[
            ("MAILER_FILE_OUTPUT_DIR", "./emails"),
            ("MAILER_FROM_ADDRESS", "site@example.com"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(config.contact_email, "site@example.com");
        assert_eq!(config.site_name, "Portfolio");
    }

    #[test]
    fn test_bad_port_is_a_config_error() {
        let result = MailerConfig::from_lookup(lookup(&[
            ("MAILER_SMTP_HOST", "smtp.example.com"),
            ("MAILER_SMTP_PORT", "smtp"),
        ]));
        assert!(matches!(result, Err(MailerError::Config(_))));
    }

    #[test]
    fn test_build_file_transport() {
        let dir = tempfile::tempdir().unwrap();
        let config = MailerConfig::from_lookup(lookup(&[(
            "MAILER_FILE_OUTPUT_DIR",
            dir.path().to_str().unwrap(),
        )]))
        .unwrap()
        .unwrap();
        assert!(config.build_transport().is_ok());
    }
}
