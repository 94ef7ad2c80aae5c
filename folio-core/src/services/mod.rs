//! Business logic on top of the repository traits.
//!
//! Services are generic over the repositories they need and hold them behind `Arc`, so
//! one storage backend can feed all of them. External capabilities (challenge
//! verification, owner notification) are injected as trait objects.

pub mod challenge;
pub mod contact;
pub mod content;
pub mod login_guard;
#[cfg(feature = "mailer")]
pub mod mailer;
pub mod notifier;
pub mod password;
pub mod resume;
pub mod submission_policy;
pub mod user;

pub use challenge::ChallengeVerifier;
pub use contact::{
    ContactFormResult, ContactFormState, ContactInputs, ContactReply, ContactService,
    ContactSubmission, SubmissionOutcome,
};
pub use content::{BlogService, ProfileService, ProjectService};
pub use login_guard::LoginGuard;
pub use notifier::ContactNotifier;
pub use password::PasswordService;
pub use resume::{CertificationService, EducationService, ExperienceService};
pub use submission_policy::{
    PolicyDecision, SubmissionAttempt, SubmissionPolicy, SubmissionPolicyConfig, Verdict,
};
pub use user::UserService;

#[cfg(feature = "mailer")]
pub use mailer::MailerContactNotifier;
