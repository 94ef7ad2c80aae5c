use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    Error,
    content::{ContactMessage, NewContactMessage, Page},
};

/// Storage for contact form submissions.
///
/// The first two methods are all the submission gatekeeper needs; the rest back the
/// admin inbox.
#[async_trait]
pub trait ContactRepository: Send + Sync + 'static {
    /// Number of stored submissions from `email` created at or after `since`.
    async fn count_submissions(&self, email: &str, since: DateTime<Utc>) -> Result<u64, Error>;

    async fn create_submission(&self, message: NewContactMessage) -> Result<ContactMessage, Error>;

    /// Newest first.
    async fn list(&self, page: Page) -> Result<Vec<ContactMessage>, Error>;

    async fn find_by_id(&self, id: &str) -> Result<Option<ContactMessage>, Error>;

    async fn set_read(&self, id: &str, read: bool) -> Result<ContactMessage, Error>;

    async fn delete(&self, id: &str) -> Result<(), Error>;

    async fn count(&self) -> Result<u64, Error>;

    async fn count_unread(&self) -> Result<u64, Error>;
}
