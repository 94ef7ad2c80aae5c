//! # Folio Axum Integration
//!
//! HTTP surface for [`folio`]: the public read API, the contact form endpoint, admin
//! login and the admin CRUD API, all behind a single access gate.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use folio::FolioBuilder;
//! use folio_axum::CookieConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let folio = FolioBuilder::new()
//!         .with_sqlite("sqlite://folio.db?mode=rwc")
//!         .await?
//!         .with_session_secret(b"a-long-random-secret-of-at-least-32-bytes".to_vec())?
//!         .apply_migrations(true)
//!         .build()
//!         .await?;
//!
//!     let app = folio_axum::routes(Arc::new(folio))
//!         .with_cookie_config(CookieConfig::development())
//!         .build();
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod extractors;
mod middleware;
mod routes;
mod types;

pub use error::{ApiError, Result};
pub use extractors::{AdminUser, AuthUser, Payload, SessionTokenFromRequest};
pub use middleware::{Access, AccessGate, AppState, access_gate};
pub use routes::create_router;
pub use types::{
    AccountRequest, ChangePasswordRequest, ConnectionInfo, ContactRequest, CookieConfig,
    CookieSameSite, HealthResponse, LoginRequest, MessageResponse, SessionResponse, UserResponse,
};

use std::sync::Arc;

use axum::Router;
use folio::{Folio, RepositoryProvider};

/// Create the application router for a [`Folio`] instance.
pub fn routes<R>(folio: Arc<Folio<R>>) -> FolioRouterBuilder<R>
where
    R: RepositoryProvider + 'static,
{
    FolioRouterBuilder {
        folio,
        cookie_config: CookieConfig::default(),
        gate: AccessGate::default(),
    }
}

/// Builder for configuring the application router
pub struct FolioRouterBuilder<R: RepositoryProvider> {
    folio: Arc<Folio<R>>,
    cookie_config: CookieConfig,
    gate: AccessGate,
}

impl<R: RepositoryProvider + 'static> FolioRouterBuilder<R> {
    pub fn with_cookie_config(mut self, config: CookieConfig) -> Self {
        self.cookie_config = config;
        self
    }

    pub fn with_access_gate(mut self, gate: AccessGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn build(self) -> Router {
        create_router(self.folio, self.gate, self.cookie_config)
    }
}

impl<R: RepositoryProvider + 'static> From<FolioRouterBuilder<R>> for Router {
    fn from(builder: FolioRouterBuilder<R>) -> Self {
        builder.build()
    }
}
