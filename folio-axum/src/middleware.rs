//! The access gate in front of the admin area.
//!
//! Every request passes through [`access_gate`]. Paths the [`AccessGate`] classifies as
//! [`Access::Protected`] need a valid session, taken from an `Authorization: Bearer`
//! header or the session cookie. Without one the visitor is sent to the login page with
//! a `callbackUrl` pointing back at what they asked for.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use folio::{Folio, RepositoryProvider, SessionToken};

use crate::types::CookieConfig;

pub struct AppState<R: RepositoryProvider> {
    pub folio: Arc<Folio<R>>,
    pub gate: Arc<AccessGate>,
    pub cookie_config: CookieConfig,
}

impl<R: RepositoryProvider> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            folio: self.folio.clone(),
            gate: self.gate.clone(),
            cookie_config: self.cookie_config.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

/// Decides which paths need a session and where to send visitors without one.
#[derive(Debug, Clone)]
pub struct AccessGate {
    protected_prefix: String,
    login_path: String,
    auth_prefix: String,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new("/admin", "/admin/login", "/api/auth")
    }
}

impl AccessGate {
    pub fn new(
        protected_prefix: impl Into<String>,
        login_path: impl Into<String>,
        auth_prefix: impl Into<String>,
    ) -> Self {
        Self {
            protected_prefix: protected_prefix.into(),
            login_path: login_path.into(),
            auth_prefix: auth_prefix.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn classify(&self, path: &str) -> Access {
        let protected = path
            .strip_prefix(self.protected_prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));

        if !protected || path.starts_with(&self.login_path) || path.starts_with(&self.auth_prefix)
        {
            Access::Public
        } else {
            Access::Protected
        }
    }

    /// Login page URL that returns to `uri`, query string included.
    pub fn login_redirect(&self, uri: &Uri) -> String {
        let target = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());

        self.login_url(&[("callbackUrl", target)])
    }

    pub(crate) fn login_url(&self, params: &[(&str, &str)]) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        format!("{}?{}", self.login_path, query)
    }
}

pub async fn access_gate<R>(
    State(state): State<AppState<R>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response
where
    R: RepositoryProvider,
{
    if state.gate.classify(request.uri().path()) == Access::Public {
        return next.run(request).await;
    }

    let Some(token) = session_token(request.headers(), &jar, &state.cookie_config.name) else {
        tracing::debug!(path = %request.uri().path(), "No session, redirecting to login");
        return Redirect::temporary(&state.gate.login_redirect(request.uri())).into_response();
    };

    match state.folio.authenticate(&token).await {
        Ok((user, session)) => {
            request.extensions_mut().insert(user);
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, path = %request.uri().path(), "Rejected session");
            Redirect::temporary(&state.gate.login_redirect(request.uri())).into_response()
        }
    }
}

/// Bearer token first, then the session cookie.
pub(crate) fn session_token(
    headers: &HeaderMap,
    jar: &CookieJar,
    cookie_name: &str,
) -> Option<SessionToken> {
    if let Some(token) = headers
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
    {
        return Some(SessionToken::new(token));
    }

    jar.get(cookie_name)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .map(SessionToken::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let gate = AccessGate::default();

        assert_eq!(gate.classify("/"), Access::Public);
        assert_eq!(gate.classify("/api/contact"), Access::Public);
        assert_eq!(gate.classify("/administrator"), Access::Public);
        assert_eq!(gate.classify("/admin/login"), Access::Public);
        assert_eq!(gate.classify("/api/auth/login"), Access::Public);

        assert_eq!(gate.classify("/admin"), Access::Protected);
        assert_eq!(gate.classify("/admin/"), Access::Protected);
        assert_eq!(gate.classify("/admin/api/projects"), Access::Protected);
    }

    #[test]
    fn test_login_redirect_keeps_query() {
        let gate = AccessGate::default();
        let uri: Uri = "/admin/api/projects?page=2".parse().unwrap();

        assert_eq!(
            gate.login_redirect(&uri),
            "/admin/login?callbackUrl=%2Fadmin%2Fapi%2Fprojects%3Fpage%3D2"
        );
    }

    #[test]
    fn test_bearer_takes_precedence_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "Bearer from-header".parse().unwrap());
        headers.insert("Cookie", "folio_session=from-cookie".parse().unwrap());
        let jar = CookieJar::from_headers(&headers);

        let token = session_token(&headers, &jar, "folio_session").unwrap();
        assert_eq!(token.as_str(), "from-header");

        headers.remove("Authorization");
        let token = session_token(&headers, &jar, "folio_session").unwrap();
        assert_eq!(token.as_str(), "from-cookie");
    }
}
