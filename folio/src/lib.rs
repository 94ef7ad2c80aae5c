//! # Folio
//!
//! Folio is the backend of a personal portfolio site: a public read API over profile,
//! projects, blog posts and résumé entries, an admin area for editing them, and a
//! contact form that defends itself with a honeypot, a sliding-window rate limit and a
//! challenge that only kicks in once an address has already written recently.
//!
//! [`Folio`] wires the services from `folio-core` onto one storage backend. Build it with
//! [`FolioBuilder`]:
//!
//! ```rust,no_run
//! use folio::FolioBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let folio = FolioBuilder::new()
//!         .with_sqlite("sqlite://folio.db?mode=rwc")
//!         .await?
//!         .with_session_secret(b"a-long-random-secret-of-at-least-32-bytes".to_vec())?
//!         .with_turnstile_secret(std::env::var("TURNSTILE_SECRET_KEY").ok())
//!         .apply_migrations(true)
//!         .build()
//!         .await?;
//!
//!     let stats = folio.dashboard_stats().await?;
//!     println!("{} projects, {} unread messages", stats.projects, stats.unread_contacts);
//!     Ok(())
//! }
//! ```
mod builder;

use std::sync::Arc;

use chrono::Duration;
use folio_core::{
    content::{
        BlogFilter, BlogPost, Certification, Education, Experience, Page, Profile, Project,
        ProjectFilter,
    },
    error::{AuthError, SessionError, utilities::FoundExt},
    repositories::{
        BlogPostRepositoryAdapter, CertificationRepositoryAdapter, ContactRepositoryAdapter,
        EducationRepositoryAdapter, ExperienceRepositoryAdapter, LoginAttemptRepositoryAdapter,
        PasswordRepositoryAdapter, ProfileRepositoryAdapter, ProjectRepositoryAdapter,
        UserRepositoryAdapter,
    },
    services::{
        BlogService, CertificationService, ContactService, EducationService, ExperienceService,
        LoginGuard, PasswordService, ProfileService, ProjectService, UserService,
    },
};
use serde::Serialize;

pub use builder::{FolioBuilder, FolioBuilderError, NoStorage, WithStorage};

/// Re-export core types from folio_core
pub use folio_core::{
    ChallengeVerifier, ContactNotifier, Error, FieldErrors, JwtConfig, LockoutPolicy,
    LockoutStatus, RepositoryProvider, Session, SessionProvider, SessionToken, User, UserId,
    services::{
        ContactFormResult, ContactFormState, ContactReply, ContactSubmission, SubmissionOutcome,
        SubmissionPolicyConfig,
    },
};
pub use folio_turnstile::TurnstileVerifier;

#[cfg(feature = "sqlite")]
pub use folio_storage_sqlite::SqliteRepositoryProvider;

#[cfg(feature = "mailer")]
pub use folio_mailer::MailerConfig;

/// Counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub projects: u64,
    pub featured_projects: u64,
    pub posts: u64,
    pub total_views: u64,
    pub contacts: u64,
    pub unread_contacts: u64,
}

/// Everything the landing page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeContent {
    pub profile: Option<Profile>,
    pub featured_projects: Vec<Project>,
    pub recent_posts: Vec<BlogPost>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    pub profile: Option<Profile>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub personal_projects: Vec<Project>,
}

const HOME_FEATURED_PROJECTS: u32 = 3;
const HOME_RECENT_POSTS: u32 = 3;

pub type Users<R> = UserService<UserRepositoryAdapter<R>>;
pub type Passwords<R> = PasswordService<UserRepositoryAdapter<R>, PasswordRepositoryAdapter<R>>;
pub type LoginProtection<R> = LoginGuard<LoginAttemptRepositoryAdapter<R>>;
pub type Contacts<R> = ContactService<ContactRepositoryAdapter<R>>;
pub type Profiles<R> = ProfileService<ProfileRepositoryAdapter<R>>;
pub type Projects<R> = ProjectService<ProjectRepositoryAdapter<R>>;
pub type Blog<R> = BlogService<BlogPostRepositoryAdapter<R>>;
pub type Experiences<R> = ExperienceService<ExperienceRepositoryAdapter<R>>;
pub type Educations<R> = EducationService<EducationRepositoryAdapter<R>>;
pub type Certifications<R> = CertificationService<CertificationRepositoryAdapter<R>>;

/// The coordinator behind every HTTP handler.
///
/// Content CRUD goes straight through the service accessors ([`Folio::projects`],
/// [`Folio::blog`], ...). Flows that touch several services, such as login or the
/// dashboard, are methods here.
pub struct Folio<R: RepositoryProvider> {
    repositories: Arc<R>,
    users: Arc<Users<R>>,
    passwords: Arc<Passwords<R>>,
    login_protection: Arc<LoginProtection<R>>,
    sessions: Arc<dyn SessionProvider>,
    session_expiry: Duration,
    contacts: Arc<Contacts<R>>,
    profile: Arc<Profiles<R>>,
    projects: Arc<Projects<R>>,
    blog: Arc<Blog<R>>,
    experience: Arc<Experiences<R>>,
    education: Arc<Educations<R>>,
    certifications: Arc<Certifications<R>>,
}

/// Assembled by the builder, consumed by [`Folio::from_parts`].
pub(crate) struct FolioParts {
    pub(crate) sessions: Arc<dyn SessionProvider>,
    pub(crate) session_expiry: Duration,
    pub(crate) lockout_policy: LockoutPolicy,
    pub(crate) submission_policy: SubmissionPolicyConfig,
    pub(crate) verifier: Arc<dyn ChallengeVerifier>,
    pub(crate) notifier: Option<Arc<dyn ContactNotifier>>,
}

impl<R: RepositoryProvider> Folio<R> {
    pub(crate) fn from_parts(repositories: Arc<R>, parts: FolioParts) -> Self {
        let user_repo = Arc::new(UserRepositoryAdapter::new(repositories.clone()));

        Self {
            users: Arc::new(UserService::new(user_repo.clone())),
            passwords: Arc::new(PasswordService::new(
                user_repo,
                Arc::new(PasswordRepositoryAdapter::new(repositories.clone())),
            )),
            login_protection: Arc::new(LoginGuard::new(
                Arc::new(LoginAttemptRepositoryAdapter::new(repositories.clone())),
                parts.lockout_policy,
            )),
            sessions: parts.sessions,
            session_expiry: parts.session_expiry,
            contacts: Arc::new(ContactService::new(
                Arc::new(ContactRepositoryAdapter::new(repositories.clone())),
                folio_core::services::SubmissionPolicy::new(parts.submission_policy),
                parts.verifier,
                parts.notifier,
            )),
            profile: Arc::new(ProfileService::new(Arc::new(ProfileRepositoryAdapter::new(
                repositories.clone(),
            )))),
            projects: Arc::new(ProjectService::new(Arc::new(ProjectRepositoryAdapter::new(
                repositories.clone(),
            )))),
            blog: Arc::new(BlogService::new(Arc::new(BlogPostRepositoryAdapter::new(
                repositories.clone(),
            )))),
            experience: Arc::new(ExperienceService::new(Arc::new(
                ExperienceRepositoryAdapter::new(repositories.clone()),
            ))),
            education: Arc::new(EducationService::new(Arc::new(
                EducationRepositoryAdapter::new(repositories.clone()),
            ))),
            certifications: Arc::new(CertificationService::new(Arc::new(
                CertificationRepositoryAdapter::new(repositories.clone()),
            ))),
            repositories,
        }
    }

    /// Run migrations for all repositories
    pub async fn migrate(&self) -> Result<(), Error> {
        self.repositories.migrate().await
    }

    pub async fn health_check(&self) -> Result<(), Error> {
        self.repositories.health_check().await
    }

    pub fn contacts(&self) -> &Contacts<R> {
        &self.contacts
    }

    pub fn profile(&self) -> &Profiles<R> {
        &self.profile
    }

    pub fn projects(&self) -> &Projects<R> {
        &self.projects
    }

    pub fn blog(&self) -> &Blog<R> {
        &self.blog
    }

    pub fn experience(&self) -> &Experiences<R> {
        &self.experience
    }

    pub fn education(&self) -> &Educations<R> {
        &self.education
    }

    pub fn certifications(&self) -> &Certifications<R> {
        &self.certifications
    }

    pub fn login_protection(&self) -> &LoginProtection<R> {
        &self.login_protection
    }

    pub async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, Error> {
        self.users.get_user(user_id).await
    }

    pub async fn count_users(&self) -> Result<u64, Error> {
        self.users.count_users().await
    }

    /// Provision an admin account with a password.
    ///
    /// The password is checked before anything is written, so a weak password leaves no
    /// half-created account behind.
    pub async fn create_admin(
        &self,
        email: &str,
        name: Option<String>,
        password: &str,
    ) -> Result<User, Error> {
        folio_core::validation::validate_password(password)?;
        let user = self.users.create_admin(email, name).await?;
        self.passwords.set_password(&user.id, password).await?;
        Ok(user)
    }

    /// Password login guarded by the login lockout.
    ///
    /// A locked address is refused before the password is looked at. Each wrong
    /// password counts towards the lock; a successful login clears the count.
    #[tracing::instrument(skip(self, password, user_agent), fields(email = %email.trim()))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        user_agent: Option<String>,
        ip_address: Option<String>,
    ) -> Result<(User, Session), Error> {
        let email = email.trim();

        if self.login_protection.is_locked(email).await? {
            tracing::warn!("Login refused for locked account");
            return Err(AuthError::AccountLocked.into());
        }

        let user = match self.passwords.authenticate(email, password).await {
            Ok(user) => user,
            Err(Error::Auth(AuthError::InvalidCredentials)) => {
                let status = self
                    .login_protection
                    .record_failure(email, ip_address.as_deref())
                    .await?;
                tracing::info!(failed_attempts = status.failed_attempts, "Failed admin login");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        self.login_protection.forget_failures(email).await?;

        let session = self
            .sessions
            .create_session(&user.id, user_agent, ip_address, self.session_expiry)
            .await?;

        tracing::info!(user_id = %user.id, "Admin logged in");
        Ok((user, session))
    }

    /// Resolve a presented token to its session and the account behind it.
    pub async fn authenticate(&self, token: &SessionToken) -> Result<(User, Session), Error> {
        let session = self.sessions.get_session(token).await?;
        if session.is_expired() {
            return Err(SessionError::Expired.into());
        }

        // a deleted account invalidates its outstanding sessions
        let user = self.users.get_user(&session.user_id).await?.ok_or_else(|| {
            SessionError::InvalidToken(format!("account {} no longer exists", session.user_id))
        })?;
        Ok((user, session))
    }

    pub async fn logout(&self, token: &SessionToken) -> Result<(), Error> {
        self.sessions.delete_session(token).await
    }

    pub async fn update_account(
        &self,
        user_id: &UserId,
        name: &str,
        email: &str,
    ) -> Result<User, Error> {
        self.users.update_account(user_id, name, email).await
    }

    pub async fn change_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        self.passwords
            .change_password(user_id, current_password, new_password)
            .await
    }

    pub async fn submit_contact(
        &self,
        submission: ContactSubmission,
        state: ContactFormState,
    ) -> ContactReply {
        self.contacts.submit(submission, state).await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, Error> {
        let (projects, featured_projects, posts, total_views, contacts, unread_contacts) = tokio::try_join!(
            self.projects.count(ProjectFilter::default()),
            self.projects.count(ProjectFilter::featured()),
            self.blog.count(BlogFilter::All),
            self.blog.total_views(),
            self.contacts.count_messages(),
            self.contacts.count_unread(),
        )?;

        Ok(DashboardStats {
            projects,
            featured_projects,
            posts,
            total_views,
            contacts,
            unread_contacts,
        })
    }

    pub async fn home(&self) -> Result<HomeContent, Error> {
        let (profile, featured_projects, recent_posts) = tokio::try_join!(
            self.profile.get(),
            self.projects
                .list(ProjectFilter::featured(), Page::first(HOME_FEATURED_PROJECTS)),
            self.blog
                .list(BlogFilter::PublishedOnly, Page::first(HOME_RECENT_POSTS)),
        )?;

        Ok(HomeContent {
            profile,
            featured_projects,
            recent_posts,
        })
    }

    pub async fn about(&self) -> Result<AboutContent, Error> {
        let (profile, experience, education, certifications, personal_projects) = tokio::try_join!(
            self.profile.get(),
            self.experience.list(),
            self.education.list(),
            self.certifications.list(),
            self.projects
                .list(ProjectFilter::personal(), Page::first(Page::MAX_PER_PAGE)),
        )?;

        Ok(AboutContent {
            profile,
            experience,
            education,
            certifications,
            personal_projects,
        })
    }

    /// The public profile, or `NotFound` when none has been saved yet.
    pub async fn public_profile(&self) -> Result<Profile, Error> {
        self.profile.get().await.or_not_found()
    }
}
