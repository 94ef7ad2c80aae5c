//! Outbound email for folio.
//!
//! The contact form notifies the site owner through a [`Mailer`]. Transports are
//! picked from the environment with [`MailerConfig::from_env`]; when neither an SMTP
//! host nor an output directory is configured there is no mailer at all and callers
//! fall back to logging.
pub mod config;
pub mod email;
pub mod error;
pub mod mailer;
mod message;
pub mod templates;
pub mod transports;

pub use config::{MailerConfig, TransportConfig};
pub use email::{Email, EmailBuilder};
pub use error::MailerError;
pub use mailer::Mailer;
pub use templates::{ContactNotification, ContactNotificationEmail};
pub use transports::{FileTransport, SmtpSecurity, SmtpSettings, SmtpTransport};

pub mod prelude {
    pub use crate::{
        ContactNotification, ContactNotificationEmail, Email, EmailBuilder, FileTransport, Mailer,
        MailerConfig, MailerError, SmtpTransport,
    };
}
