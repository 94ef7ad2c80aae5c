use crate::{Email, MailerError};
use async_trait::async_trait;

/// Anything that can deliver an [`Email`].
///
/// Implementations must be cheap to share behind an `Arc`; the contact service holds one
/// for the life of the process.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email(&self, email: Email) -> Result<(), MailerError>;
}
