use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lettre::Transport;

use crate::message::build_message;
use crate::{Email, Mailer, MailerError};

/// Writes each message as an `.eml` file, for development machines without SMTP.
#[derive(Debug, Clone)]
pub struct FileTransport {
    outbox: lettre::FileTransport,
    dir: PathBuf,
}

impl FileTransport {
    /// Use `dir` as the outbox, creating it when missing.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, MailerError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            outbox: lettre::FileTransport::new(&dir),
            dir,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl Mailer for FileTransport {
    async fn send_email(&self, email: Email) -> Result<(), MailerError> {
        let message = build_message(email)?;
        let outbox = self.outbox.clone();

        let written = tokio::task::spawn_blocking(move || outbox.send(&message))
            .await
            .map_err(|e| MailerError::Task(e.to_string()))??;
        tracing::debug!(id = %written, dir = %self.dir.display(), "Wrote notification to outbox");

        Ok(())
    }
}
