use async_trait::async_trait;

use crate::{Error, content::ContactMessage};

/// Tells the site owner about a stored contact message.
///
/// Failures are reported but never undo the submission.
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    async fn notify(&self, message: &ContactMessage) -> Result<(), Error>;
}
