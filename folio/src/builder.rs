//! Builder pattern for constructing Folio instances
//!
//! Storage has to be chosen before anything else, and the type-state on
//! [`FolioBuilder`] makes forgetting it a compile error. A session signing key is
//! checked at [`FolioBuilder::build`] instead, since it normally comes from the
//! environment.
//!
//! # Example
//!
//! ```rust,no_run
//! use folio::FolioBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let folio = FolioBuilder::new()
//!         .with_sqlite("sqlite::memory:")
//!         .await?
//!         .with_session_secret(vec![7u8; 32])?
//!         .apply_migrations(true)
//!         .build()
//!         .await?;
//!
//!     folio.health_check().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use chrono::Duration;
use folio_core::{
    ChallengeVerifier, ContactNotifier, JwtConfig, JwtSessionProvider, LockoutPolicy,
    RepositoryProvider, SessionProvider, services::SubmissionPolicyConfig,
};
use folio_turnstile::TurnstileVerifier;

use crate::{Folio, FolioParts};

#[cfg(feature = "mailer")]
use crate::MailerConfig;

/// Errors that can occur when building a Folio instance.
#[derive(Debug, thiserror::Error)]
pub enum FolioBuilderError {
    #[error("Storage connection failed: {0}")]
    StorageConnection(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[cfg(feature = "mailer")]
    #[error("Mailer configuration failed: {0}")]
    MailerConfiguration(String),
}

/// Marker type indicating no storage has been configured yet.
pub struct NoStorage;

/// Marker type indicating storage has been configured.
pub struct WithStorage<R: RepositoryProvider> {
    repositories: Arc<R>,
}

/// A type-safe builder for constructing [`Folio`] instances.
///
/// # Defaults
///
/// - Session expiry: 30 days
/// - Login lockout: enabled (5 failures, 15 minute lockout)
/// - Contact policy: 1 hour window, challenge from the 2nd message, refuse from the 6th
/// - Challenge verifier: Turnstile without a secret, which accepts everything
/// - Contact notifications: none
/// - Apply migrations: false
pub struct FolioBuilder<Storage> {
    storage: Storage,
    jwt_config: Option<JwtConfig>,
    session_expiry: Duration,
    lockout_policy: LockoutPolicy,
    submission_policy: SubmissionPolicyConfig,
    verifier: Option<Arc<dyn ChallengeVerifier>>,
    notifier: Option<Arc<dyn ContactNotifier>>,
    apply_migrations: bool,
    #[cfg(feature = "mailer")]
    mailer_config: Option<MailerConfig>,
}

impl Default for FolioBuilder<NoStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl FolioBuilder<NoStorage> {
    pub fn new() -> Self {
        Self {
            storage: NoStorage,
            jwt_config: None,
            session_expiry: Duration::days(30),
            lockout_policy: LockoutPolicy::default(),
            submission_policy: SubmissionPolicyConfig::default(),
            verifier: None,
            notifier: None,
            apply_migrations: false,
            #[cfg(feature = "mailer")]
            mailer_config: None,
        }
    }

    /// Use any repository provider, e.g. one shared with other parts of an application.
    pub fn with_repositories<R: RepositoryProvider>(
        self,
        repositories: Arc<R>,
    ) -> FolioBuilder<WithStorage<R>> {
        self.with_storage(WithStorage { repositories })
    }

    fn with_storage<S>(self, storage: S) -> FolioBuilder<S> {
        FolioBuilder {
            storage,
            jwt_config: self.jwt_config,
            session_expiry: self.session_expiry,
            lockout_policy: self.lockout_policy,
            submission_policy: self.submission_policy,
            verifier: self.verifier,
            notifier: self.notifier,
            apply_migrations: self.apply_migrations,
            #[cfg(feature = "mailer")]
            mailer_config: self.mailer_config,
        }
    }
}

#[cfg(feature = "sqlite")]
impl FolioBuilder<NoStorage> {
    /// Configure SQLite storage by connecting to the given URL.
    ///
    /// `sqlite::memory:` gets a single-connection pool so every query sees the same
    /// database.
    pub async fn with_sqlite(
        self,
        url: &str,
    ) -> Result<FolioBuilder<WithStorage<crate::SqliteRepositoryProvider>>, FolioBuilderError> {
        let provider = crate::SqliteRepositoryProvider::connect(url)
            .await
            .map_err(|e| FolioBuilderError::StorageConnection(e.to_string()))?;

        Ok(self.with_repositories(Arc::new(provider)))
    }

    /// Configure SQLite storage with an existing connection pool.
    pub fn with_sqlite_pool(
        self,
        pool: sqlx::SqlitePool,
    ) -> FolioBuilder<WithStorage<crate::SqliteRepositoryProvider>> {
        self.with_repositories(Arc::new(crate::SqliteRepositoryProvider::new(pool)))
    }
}

impl<R: RepositoryProvider> FolioBuilder<WithStorage<R>> {
    pub fn with_jwt_sessions(mut self, config: JwtConfig) -> Self {
        self.jwt_config = Some(config);
        self
    }

    /// HS256 sessions signed with `secret`, which must be at least 32 bytes.
    pub fn with_session_secret(
        self,
        secret: impl Into<Vec<u8>>,
    ) -> Result<Self, FolioBuilderError> {
        let config = JwtConfig::new_hs256(secret.into())
            .map_err(|e| FolioBuilderError::InvalidConfiguration(e.to_string()))?
            .with_issuer("folio");
        Ok(self.with_jwt_sessions(config))
    }

    pub fn with_session_expiry(mut self, duration: Duration) -> Self {
        self.session_expiry = duration;
        self
    }

    pub fn with_lockout_policy(mut self, config: LockoutPolicy) -> Self {
        self.lockout_policy = config;
        self
    }

    pub fn with_submission_policy(mut self, config: SubmissionPolicyConfig) -> Self {
        self.submission_policy = config;
        self
    }

    pub fn with_challenge_verifier(mut self, verifier: Arc<dyn ChallengeVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Verify challenges with Turnstile. `None` or a blank secret disables challenges.
    pub fn with_turnstile_secret(self, secret: Option<String>) -> Self {
        let verifier = TurnstileVerifier::new(secret);
        if !verifier.is_configured() {
            tracing::warn!("Turnstile secret not configured, contact challenges always pass");
        }
        self.with_challenge_verifier(Arc::new(verifier))
    }

    /// Notify the site owner about new contact messages. Takes precedence over a mailer.
    pub fn with_contact_notifier(mut self, notifier: Arc<dyn ContactNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[cfg(feature = "mailer")]
    pub fn with_mailer(mut self, config: MailerConfig) -> Self {
        self.mailer_config = Some(config);
        self
    }

    /// Configure the mailer from `MAILER_*` environment variables, if any are set.
    ///
    /// See [`MailerConfig::from_env`]. Without a transport configured notifications stay
    /// off and the builder is returned unchanged.
    #[cfg(feature = "mailer")]
    pub fn with_mailer_from_env(mut self) -> Result<Self, FolioBuilderError> {
        self.mailer_config = MailerConfig::from_env()
            .map_err(|e| FolioBuilderError::MailerConfiguration(e.to_string()))?;
        Ok(self)
    }

    /// Set whether to automatically apply database migrations during build.
    pub fn apply_migrations(mut self, apply: bool) -> Self {
        self.apply_migrations = apply;
        self
    }

    pub async fn build(self) -> Result<Folio<R>, FolioBuilderError> {
        let jwt_config = self.jwt_config.ok_or_else(|| {
            FolioBuilderError::InvalidConfiguration("a session signing secret is required".into())
        })?;

        if self.apply_migrations {
            self.storage
                .repositories
                .migrate()
                .await
                .map_err(|e| FolioBuilderError::Migration(e.to_string()))?;
        }

        #[cfg(feature = "mailer")]
        let notifier = match (self.notifier, self.mailer_config) {
            (Some(notifier), _) => Some(notifier),
            (None, Some(config)) => {
                let notifier = folio_core::services::MailerContactNotifier::from_config(config)
                    .map_err(|e| FolioBuilderError::MailerConfiguration(e.to_string()))?;
                Some(Arc::new(notifier) as Arc<dyn ContactNotifier>)
            }
            (None, None) => None,
        };
        #[cfg(not(feature = "mailer"))]
        let notifier = self.notifier;

        let verifier = self
            .verifier
            .unwrap_or_else(|| Arc::new(TurnstileVerifier::new(None)));

        let sessions: Arc<dyn SessionProvider> = Arc::new(JwtSessionProvider::new(jwt_config));

        Ok(Folio::from_parts(
            self.storage.repositories,
            FolioParts {
                sessions,
                session_expiry: self.session_expiry,
                lockout_policy: self.lockout_policy,
                submission_policy: self.submission_policy,
                verifier,
                notifier,
            },
        ))
    }
}
