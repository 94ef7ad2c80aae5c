//! Runtime configuration read from the environment.
use std::net::SocketAddr;

use chrono::Duration;
use folio_core::session::MIN_SECRET_LEN;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://folio.db?mode=rwc";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_SESSION_TTL_HOURS: i64 = 720;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not valid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind: SocketAddr,
    pub session_secret: Option<Vec<u8>>,
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    pub turnstile_secret: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                  | Default                      |
    /// | ------------------------- | ---------------------------- |
    /// | `DATABASE_URL`            | `sqlite://folio.db?mode=rwc` |
    /// | `FOLIO_BIND`              | `127.0.0.1:3000`             |
    /// | `FOLIO_SESSION_SECRET`    | none, required to serve      |
    /// | `FOLIO_SESSION_TTL_HOURS` | `720`                        |
    /// | `FOLIO_COOKIE_SECURE`     | `true`                       |
    /// | `TURNSTILE_SECRET_KEY`    | none, challenges disabled    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("FOLIO_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind.parse().map_err(|_| ConfigError::Invalid {
            name: "FOLIO_BIND",
            reason: format!("{bind} is not a socket address"),
        })?;

        let session_secret = match lookup("FOLIO_SESSION_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                return Err(ConfigError::Invalid {
                    name: "FOLIO_SESSION_SECRET",
                    reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
                });
            }
            secret => secret.map(String::into_bytes),
        };

        let session_ttl = match lookup("FOLIO_SESSION_TTL_HOURS") {
            Some(hours) => match hours.parse::<i64>() {
                Ok(hours) if hours > 0 => Duration::hours(hours),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "FOLIO_SESSION_TTL_HOURS",
                        reason: format!("{hours} is not a positive number of hours"),
                    });
                }
            },
            None => Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        };

        let cookie_secure = match lookup("FOLIO_COOKIE_SECURE") {
            Some(value) => parse_bool("FOLIO_COOKIE_SECURE", &value)?,
            None => true,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind,
            session_secret,
            session_ttl,
            cookie_secure,
            turnstile_secret: lookup("TURNSTILE_SECRET_KEY"),
        })
    }

    pub fn require_session_secret(&self) -> Result<Vec<u8>, ConfigError> {
        self.session_secret
            .clone()
            .ok_or(ConfigError::Missing("FOLIO_SESSION_SECRET"))
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            reason: format!("{value} is not a boolean"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.session_ttl, Duration::hours(720));
        assert!(config.cookie_secure);
        assert!(config.turnstile_secret.is_none());
        assert!(matches!(
            config.require_session_secret(),
            Err(ConfigError::Missing("FOLIO_SESSION_SECRET"))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("FOLIO_BIND", "0.0.0.0:8080"),
            ("FOLIO_SESSION_SECRET", "0123456789abcdef0123456789abcdef"),
            ("FOLIO_SESSION_TTL_HOURS", "24"),
            ("FOLIO_COOKIE_SECURE", "false"),
            ("TURNSTILE_SECRET_KEY", "turnstile-secret"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.require_session_secret().unwrap().len(), 32);
        assert_eq!(config.session_ttl, Duration::hours(24));
        assert!(!config.cookie_secure);
        assert_eq!(config.turnstile_secret.as_deref(), Some("turnstile-secret"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("FOLIO_SESSION_SECRET", "short")]),
            Err(ConfigError::Invalid { name: "FOLIO_SESSION_SECRET", .. })
        ));
        assert!(matches!(
            load(&[("FOLIO_BIND", "localhost")]),
            Err(ConfigError::Invalid { name: "FOLIO_BIND", .. })
        ));
        assert!(matches!(
            load(&[("FOLIO_SESSION_TTL_HOURS", "-1")]),
            Err(ConfigError::Invalid { name: "FOLIO_SESSION_TTL_HOURS", .. })
        ));
        assert!(matches!(
            load(&[("FOLIO_COOKIE_SECURE", "maybe")]),
            Err(ConfigError::Invalid { name: "FOLIO_COOKIE_SECURE", .. })
        ));
    }
}
