use std::sync::Arc;

use async_trait::async_trait;
use folio_mailer::{ContactNotification, ContactNotificationEmail, Mailer, MailerConfig};

use crate::{Error, content::ContactMessage, services::ContactNotifier};

/// Emails contact messages to the configured owner address.
pub struct MailerContactNotifier {
    mailer: Arc<dyn Mailer>,
    config: MailerConfig,
}

impl MailerContactNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, config: MailerConfig) -> Self {
        Self { mailer, config }
    }

    /// Build the transport described by `config`.
    pub fn from_config(config: MailerConfig) -> Result<Self, Error> {
        let mailer = config
            .build_transport()
            .map_err(|e| Error::Notification(e.to_string()))?;
        Ok(Self::new(Arc::from(mailer), config))
    }
}

#[async_trait]
impl ContactNotifier for MailerContactNotifier {
    async fn notify(&self, message: &ContactMessage) -> Result<(), Error> {
        let notification = ContactNotification {
            name: message.name.clone(),
            email: message.email.clone(),
            subject: message.subject.clone(),
            message: message.message.clone(),
        };

        let email = ContactNotificationEmail::build(&self.config, &notification)
            .map_err(|e| Error::Notification(e.to_string()))?;

        self.mailer
            .send_email(email)
            .await
            .map_err(|e| Error::Notification(e.to_string()))?;

        tracing::debug!(message_id = %message.id, "Sent contact notification");
        Ok(())
    }
}
