use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use folio::{
    ChallengeVerifier, ContactFormState, ContactNotifier, ContactSubmission, Error, Folio,
    FolioBuilder, FolioBuilderError, LockoutPolicy, SessionToken, SqliteRepositoryProvider,
};
use folio_core::{
    content::{BlogPostInput, ContactMessage, Page, ProfileInput, ProjectInput},
    error::{AuthError, ValidationError},
};

const SECRET: &[u8] = b"folio-integration-test-secret-0123456789";
const PASSWORD: &str = "correct horse battery";

/// Accepts exactly one token.
struct FixedTokenVerifier;

#[async_trait]
impl ChallengeVerifier for FixedTokenVerifier {
    async fn verify(&self, token: &str) -> bool {
        token == "valid"
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<ContactMessage>>,
}

#[async_trait]
impl ContactNotifier for RecordingNotifier {
    async fn notify(&self, message: &ContactMessage) -> Result<(), Error> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

async fn setup() -> Folio<SqliteRepositoryProvider> {
    FolioBuilder::new()
        .with_sqlite("sqlite::memory:")
        .await
        .expect("Failed to connect to SQLite")
        .with_session_secret(SECRET.to_vec())
        .expect("Invalid secret")
        .with_challenge_verifier(Arc::new(FixedTokenVerifier))
        .apply_migrations(true)
        .build()
        .await
        .expect("Failed to build Folio")
}

fn submission(email: &str, token: Option<&str>) -> ContactSubmission {
    ContactSubmission {
        name: "Ada Lovelace".to_string(),
        email: email.to_string(),
        subject: "Project".to_string(),
        message: "Let's build something.".to_string(),
        website: None,
        token: token.map(str::to_string),
    }
}

#[tokio::test]
async fn test_build_requires_session_secret() {
    let result = FolioBuilder::new()
        .with_sqlite("sqlite::memory:")
        .await
        .unwrap()
        .build()
        .await;
    assert!(matches!(
        result,
        Err(FolioBuilderError::InvalidConfiguration(_))
    ));
}

#[tokio::test]
async fn test_short_session_secret_rejected() {
    let result = FolioBuilder::new()
        .with_sqlite("sqlite::memory:")
        .await
        .unwrap()
        .with_session_secret(b"short".to_vec());
    assert!(matches!(
        result,
        Err(FolioBuilderError::InvalidConfiguration(_))
    ));
}

#[tokio::test]
async fn test_manual_migration() {
    let folio = FolioBuilder::new()
        .with_sqlite("sqlite::memory:")
        .await
        .unwrap()
        .with_session_secret(SECRET.to_vec())
        .unwrap()
        .build()
        .await
        .unwrap();

    folio.migrate().await.expect("Migration failed");
    folio.health_check().await.expect("Health check failed");
    assert_eq!(folio.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_contact_rate_limit_end_to_end() {
    let folio = setup().await;
    let state = ContactFormState::default();

    let first = folio
        .submit_contact(submission("a@x.com", None), state)
        .await
        .form;
    assert!(first.success);
    assert!(!first.requires_captcha);

    // the second message needs a challenge before it is stored
    let challenged = folio
        .submit_contact(submission("a@x.com", None), state)
        .await
        .form;
    assert!(!challenged.success);
    assert!(challenged.requires_captcha);
    assert_eq!(challenged.message, "Please complete the security check.");
    assert_eq!(challenged.inputs.unwrap().email, "a@x.com");

    let failed = folio
        .submit_contact(submission("a@x.com", Some("forged")), state)
        .await
        .form;
    assert!(!failed.success);
    assert_eq!(failed.message, "Security check failed. Please try again.");

    for _ in 2..=5 {
        let result = folio
            .submit_contact(submission("a@x.com", Some("valid")), state)
            .await
            .form;
        assert!(result.success, "{}", result.message);
    }
    assert_eq!(folio.contacts().count_messages().await.unwrap(), 5);

    let limited = folio
        .submit_contact(submission("a@x.com", Some("valid")), state)
        .await
        .form;
    assert!(!limited.success);
    assert!(!limited.requires_captcha);
    assert_eq!(limited.message, "Too many requests. Please try again later.");
    assert_eq!(folio.contacts().count_messages().await.unwrap(), 5);

    // another sender is unaffected
    let other = folio
        .submit_contact(submission("b@x.com", None), state)
        .await
        .form;
    assert!(other.success);
}

#[tokio::test]
async fn test_honeypot_and_notifications() {
    let notifier = Arc::new(RecordingNotifier::default());
    let folio = FolioBuilder::new()
        .with_sqlite("sqlite::memory:")
        .await
        .unwrap()
        .with_session_secret(SECRET.to_vec())
        .unwrap()
        .with_contact_notifier(notifier.clone())
        .apply_migrations(true)
        .build()
        .await
        .unwrap();

    let bot = ContactSubmission {
        website: Some("https://spam.example".to_string()),
        ..submission("bot@x.com", None)
    };
    let result = folio
        .submit_contact(bot, ContactFormState::default())
        .await
        .form;
    assert!(result.success);
    assert_eq!(result.message, "Message sent successfully!");
    assert_eq!(folio.contacts().count_messages().await.unwrap(), 0);
    assert!(notifier.sent.lock().unwrap().is_empty());

    let human = folio
        .submit_contact(submission("ada@x.com", None), ContactFormState::default())
        .await
        .form;
    assert!(human.success);

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].email, "ada@x.com");
}

#[tokio::test]
async fn test_login_and_session_roundtrip() {
    let folio = setup().await;
    let admin = folio
        .create_admin("admin@example.com", Some("Admin".to_string()), PASSWORD)
        .await
        .unwrap();

    let (user, session) = folio
        .login(" admin@example.com ", PASSWORD, None, Some("127.0.0.1".into()))
        .await
        .unwrap();
    assert_eq!(user.id, admin.id);

    let (resolved, _) = folio.authenticate(&session.token).await.unwrap();
    assert_eq!(resolved.email, "admin@example.com");

    let forged = folio.authenticate(&SessionToken::new("not.a.jwt")).await;
    assert!(matches!(forged, Err(e) if e.is_session_error()));
}

#[tokio::test]
async fn test_create_admin_rejects_weak_password_without_side_effects() {
    let folio = setup().await;
    let result = folio.create_admin("admin@example.com", None, "short").await;
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::WeakPassword))
    ));
    assert_eq!(folio.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_login_lockout() {
    let folio = FolioBuilder::new()
        .with_sqlite("sqlite::memory:")
        .await
        .unwrap()
        .with_session_secret(SECRET.to_vec())
        .unwrap()
        .with_lockout_policy(LockoutPolicy {
            max_failed_attempts: 3,
            ..LockoutPolicy::default()
        })
        .apply_migrations(true)
        .build()
        .await
        .unwrap();
    folio
        .create_admin("admin@example.com", None, PASSWORD)
        .await
        .unwrap();

    for _ in 0..3 {
        let result = folio
            .login("admin@example.com", "wrong password", None, None)
            .await;
        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::InvalidCredentials))
        ));
    }

    // even the right password is refused while locked
    let locked = folio.login("admin@example.com", PASSWORD, None, None).await;
    assert!(matches!(locked, Err(Error::Auth(AuthError::AccountLocked))));
}

#[tokio::test]
async fn test_successful_login_resets_failures() {
    let folio = setup().await;
    folio
        .create_admin("admin@example.com", None, PASSWORD)
        .await
        .unwrap();

    for _ in 0..4 {
        let _ = folio.login("admin@example.com", "nope", None, None).await;
    }
    folio
        .login("admin@example.com", PASSWORD, None, None)
        .await
        .unwrap();

    let status = folio
        .login_protection()
        .lockout_status("admin@example.com")
        .await
        .unwrap();
    assert_eq!(status.failed_attempts, 0);
}

#[tokio::test]
async fn test_change_password_and_account() {
    let folio = setup().await;
    let admin = folio
        .create_admin("admin@example.com", None, PASSWORD)
        .await
        .unwrap();

    let wrong = folio
        .change_password(&admin.id, "not it", "a brand new password")
        .await;
    let Err(Error::Validation(ValidationError::Fields(errors))) = wrong else {
        panic!("expected field errors, got {wrong:?}");
    };
    assert_eq!(
        errors.get("currentPassword").unwrap(),
        ["Incorrect current password"]
    );

    folio
        .change_password(&admin.id, PASSWORD, "a brand new password")
        .await
        .unwrap();
    folio
        .login("admin@example.com", "a brand new password", None, None)
        .await
        .unwrap();

    let updated = folio
        .update_account(&admin.id, "Ada", "ada@example.com")
        .await
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_dashboard_and_public_pages() {
    let folio = setup().await;

    assert!(folio.public_profile().await.unwrap_err().is_not_found());

    folio
        .profile()
        .save(ProfileInput {
            name: "Ada".into(),
            title: "Engineer".into(),
            bio: "Builds analytical engines".into(),
            ..ProfileInput::default()
        })
        .await
        .unwrap();

    for (slug, featured, personal) in [
        ("engine", true, false),
        ("notes", false, true),
        ("loom", true, false),
    ] {
        folio
            .projects()
            .create(ProjectInput {
                title: slug.into(),
                slug: slug.into(),
                featured,
                is_personal: personal,
                ..ProjectInput::default()
            })
            .await
            .unwrap();
    }

    let published = folio
        .blog()
        .create(BlogPostInput {
            title: "Hello".into(),
            slug: "hello".into(),
            content: "First post".into(),
            ..BlogPostInput::default()
        })
        .await
        .unwrap();
    folio
        .blog()
        .create(BlogPostInput {
            title: "Draft".into(),
            slug: "draft".into(),
            content: "Not yet".into(),
            published: false,
            ..BlogPostInput::default()
        })
        .await
        .unwrap();
    folio.blog().read_published(&published.slug).await.unwrap();

    folio
        .submit_contact(submission("ada@x.com", None), ContactFormState::default())
        .await;

    let stats = folio.dashboard_stats().await.unwrap();
    assert_eq!(stats.projects, 3);
    assert_eq!(stats.featured_projects, 2);
    assert_eq!(stats.posts, 2);
    assert_eq!(stats.total_views, 1);
    assert_eq!(stats.contacts, 1);
    assert_eq!(stats.unread_contacts, 1);

    let home = folio.home().await.unwrap();
    assert_eq!(home.profile.unwrap().name, "Ada");
    assert_eq!(home.featured_projects.len(), 2);
    assert_eq!(home.recent_posts.len(), 1);

    let about = folio.about().await.unwrap();
    assert_eq!(about.personal_projects.len(), 1);
    assert_eq!(about.personal_projects[0].slug, "notes");

    let messages = folio.contacts().list_messages(Page::first(20)).await.unwrap();
    let toggled = folio.contacts().toggle_read(&messages[0].id).await.unwrap();
    assert!(toggled.read);
    assert_eq!(folio.dashboard_stats().await.unwrap().unread_contacts, 0);
}
