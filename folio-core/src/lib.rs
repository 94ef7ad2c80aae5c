//! Core of the folio portfolio backend.
//!
//! Holds the domain types (admin users, sessions, portfolio content, contact messages),
//! the error taxonomy, the repository traits storage backends implement and the services
//! built on them. The contact form gatekeeper lives in [`services::contact`], the rate
//! policy it consults in [`services::submission_policy`].
//!
//! Nothing here talks to a database or the network directly. Storage comes from a
//! [`RepositoryProvider`]; challenge verification and notifications from the
//! [`ChallengeVerifier`] and [`ContactNotifier`] traits.
pub mod content;
pub mod error;
pub mod id;
pub mod repositories;
pub mod services;
pub mod session;
pub mod storage;
pub mod user;
pub mod validation;

pub use error::Error;
pub use repositories::RepositoryProvider;
pub use services::{ChallengeVerifier, ContactNotifier};
pub use session::{JwtConfig, JwtSessionProvider, Session, SessionProvider, SessionToken};
pub use storage::{LockoutPolicy, LockoutStatus};
pub use user::{NewUser, User, UserId};
pub use validation::FieldErrors;
