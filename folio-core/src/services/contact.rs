//! The public contact form and the admin inbox behind it.
//!
//! [`ContactService::submit`] runs every submission through the same sequence: field
//! validation, the honeypot, the per-sender rate policy, an optional challenge, storage
//! and finally the owner notification. Each call ends in exactly one
//! [`SubmissionOutcome`]; internal failures are folded into [`SubmissionOutcome::Failed`]
//! instead of surfacing as errors.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    Error,
    content::{ContactMessage, NewContactMessage, Page},
    error::utilities::FoundExt,
    repositories::ContactRepository,
    services::{
        ChallengeVerifier, ContactNotifier,
        submission_policy::{SubmissionPolicy, Verdict},
    },
    validation::{FieldErrors, is_valid_email, required_text},
};

pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";
pub const INVALID_MESSAGE: &str = "Please fix the errors below.";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";
pub const CHALLENGE_REQUIRED_MESSAGE: &str = "Please complete the security check.";
pub const CHALLENGE_FAILED_MESSAGE: &str = "Security check failed. Please try again.";
pub const FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

/// Raw contact form fields as posted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Honeypot. Hidden from humans, so anything here came from a bot.
    pub website: Option<String>,
    /// Challenge widget token, present once the visitor solved a challenge.
    #[serde(alias = "cf-turnstile-response")]
    pub token: Option<String>,
}

impl ContactSubmission {
    pub fn inputs(&self) -> ContactInputs {
        ContactInputs {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
        }
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    fn honeypot_filled(&self) -> bool {
        self.website
            .as_deref()
            .is_some_and(|w| !w.trim().is_empty())
    }
}

/// State the form carries between attempts. Only the client holds it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactFormState {
    pub requires_captcha: bool,
}

/// Echo of the submitted fields so a failed form can be refilled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInputs {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    Invalid(FieldErrors),
    /// Honeypot tripped. Looks like success from the outside.
    SilentlyAccepted,
    RateLimited,
    ChallengeRequired,
    ChallengeFailed,
    Failed,
    Accepted(ContactMessage),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::SilentlyAccepted | Self::Accepted(_))
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Invalid(_) => INVALID_MESSAGE,
            Self::SilentlyAccepted | Self::Accepted(_) => SUCCESS_MESSAGE,
            Self::RateLimited => RATE_LIMITED_MESSAGE,
            Self::ChallengeRequired => CHALLENGE_REQUIRED_MESSAGE,
            Self::ChallengeFailed => CHALLENGE_FAILED_MESSAGE,
            Self::Failed => FAILED_MESSAGE,
        }
    }

    /// Whether the next attempt from this form has to carry a challenge token.
    pub fn requires_captcha(&self, state: &ContactFormState) -> bool {
        match self {
            Self::Invalid(_) => state.requires_captcha,
            Self::ChallengeRequired | Self::ChallengeFailed => true,
            _ => false,
        }
    }

    pub fn form_result(
        &self,
        inputs: ContactInputs,
        state: &ContactFormState,
    ) -> ContactFormResult {
        let success = self.is_success();
        let message = self.message().to_string();
        let requires_captcha = self.requires_captcha(state);
        let errors = match self {
            Self::Invalid(errors) => errors.clone(),
            _ => FieldErrors::new(),
        };

        ContactFormResult {
            success,
            message,
            requires_captcha,
            errors,
            inputs: (!success).then_some(inputs),
        }
    }
}

/// What the form gets back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormResult {
    pub success: bool,
    pub message: String,
    pub requires_captcha: bool,
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<ContactInputs>,
}

/// A gatekeeper decision together with the reply for the form.
#[derive(Debug, Clone)]
pub struct ContactReply {
    pub outcome: SubmissionOutcome,
    pub form: ContactFormResult,
}

pub struct ContactService<R: ContactRepository> {
    repository: Arc<R>,
    policy: SubmissionPolicy,
    verifier: Arc<dyn ChallengeVerifier>,
    notifier: Option<Arc<dyn ContactNotifier>>,
}

impl<R: ContactRepository> ContactService<R> {
    pub fn new(
        repository: Arc<R>,
        policy: SubmissionPolicy,
        verifier: Arc<dyn ChallengeVerifier>,
        notifier: Option<Arc<dyn ContactNotifier>>,
    ) -> Self {
        Self {
            repository,
            policy,
            verifier,
            notifier,
        }
    }

    /// Run one submission through the gatekeeper and shape the reply for the form.
    pub async fn submit(
        &self,
        submission: ContactSubmission,
        state: ContactFormState,
    ) -> ContactReply {
        let inputs = submission.inputs();
        let outcome = self.process(submission, state, Utc::now()).await;
        let form = outcome.form_result(inputs, &state);
        ContactReply { outcome, form }
    }

    #[instrument(skip_all, fields(requires_captcha = state.requires_captcha))]
    pub async fn process(
        &self,
        submission: ContactSubmission,
        state: ContactFormState,
        now: DateTime<Utc>,
    ) -> SubmissionOutcome {
        let validated = match validate_submission(&submission) {
            Ok(validated) => validated,
            Err(errors) => return SubmissionOutcome::Invalid(errors),
        };

        if submission.honeypot_filled() {
            tracing::info!("Honeypot field filled, dropping contact submission");
            return SubmissionOutcome::SilentlyAccepted;
        }

        let since = self.policy.window_start(now);
        let recent = match self
            .repository
            .count_submissions(&validated.email, since)
            .await
        {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(error = %e, "Failed to count recent contact submissions");
                return SubmissionOutcome::Failed;
            }
        };

        let decision = self.policy.decide(recent, state.requires_captcha);
        tracing::debug!(
            verdict = ?decision.verdict,
            recent_count = decision.recent_count,
            reason = decision.reason,
            "Evaluated contact submission"
        );

        match decision.verdict {
            Verdict::HardReject => return SubmissionOutcome::RateLimited,
            Verdict::RequireChallenge => {
                let Some(token) = submission.token() else {
                    return SubmissionOutcome::ChallengeRequired;
                };
                if !self.verifier.verify(token).await {
                    tracing::info!("Challenge token rejected");
                    return SubmissionOutcome::ChallengeFailed;
                }
            }
            Verdict::Accept => {}
        }

        let mut record = NewContactMessage::new(
            validated.name,
            validated.email,
            validated.subject,
            validated.message,
        );
        record.created_at = now;

        let stored = match self.repository.create_submission(record).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(error = %e, "Failed to save contact message");
                return SubmissionOutcome::Failed;
            }
        };

        self.notify(&stored).await;

        SubmissionOutcome::Accepted(stored)
    }

    async fn notify(&self, message: &ContactMessage) {
        match &self.notifier {
            Some(notifier) => {
                if let Err(e) = notifier.notify(message).await {
                    tracing::error!(error = %e, message_id = %message.id, "Failed to send contact notification");
                }
            }
            None => {
                tracing::warn!("Contact notifications not configured, logging message instead");
                tracing::info!(
                    name = %message.name,
                    email = %message.email,
                    subject = %message.subject,
                    message = %message.message,
                    "Contact form submission"
                );
            }
        }
    }

    /// Inbox page, newest first.
    pub async fn list_messages(&self, page: Page) -> Result<Vec<ContactMessage>, Error> {
        self.repository.list(page).await
    }

    pub async fn get_message(&self, id: &str) -> Result<ContactMessage, Error> {
        self.repository.find_by_id(id).await.or_not_found()
    }

    /// Flip the read flag and return the updated message.
    pub async fn toggle_read(&self, id: &str) -> Result<ContactMessage, Error> {
        let message = self.get_message(id).await?;
        self.repository.set_read(id, !message.read).await
    }

    pub async fn delete_message(&self, id: &str) -> Result<(), Error> {
        self.repository.delete(id).await
    }

    pub async fn count_messages(&self) -> Result<u64, Error> {
        self.repository.count().await
    }

    pub async fn count_unread(&self) -> Result<u64, Error> {
        self.repository.count_unread().await
    }
}

struct ValidSubmission {
    name: String,
    email: String,
    subject: String,
    message: String,
}

fn validate_submission(submission: &ContactSubmission) -> Result<ValidSubmission, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required_text(&mut errors, "name", submission.name.clone(), "Name is required");
    let email = submission.email.trim().to_string();
    if !is_valid_email(&email) {
        errors.add("email", "Invalid email address");
    }
    let subject = required_text(
        &mut errors,
        "subject",
        submission.subject.clone(),
        "Subject is required",
    );
    let message = required_text(
        &mut errors,
        "message",
        submission.message.clone(),
        "Message is required",
    );

    errors.into_result(ValidSubmission {
        name,
        email,
        subject,
        message,
    })
}
