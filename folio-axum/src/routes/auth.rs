//! Admin sign-in, sign-out and the login page.
//!
//! Login accepts JSON for API clients and urlencoded posts from the login page. Form
//! posts are answered with redirects: back to the callback on success, back to the login
//! page with an error otherwise.
use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use folio::RepositoryProvider;

use crate::{
    error::{ApiError, Result},
    extractors::{Payload, SessionTokenFromRequest},
    middleware::AppState,
    types::{
        ConnectionInfo, CookieConfig, CookieSameSite, LoginPageQuery, LoginRequest,
        MessageResponse, SessionResponse,
    },
};

const DEFAULT_CALLBACK: &str = "/admin";

pub(super) fn routes<R>() -> Router<AppState<R>>
where
    R: RepositoryProvider + 'static,
{
    Router::new()
        .route("/admin/login", get(login_page_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/session", get(session_handler))
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Sign in</title></head>
<body>
<main>
    <h1>Sign in</h1>
    {% if let Some(error) = error %}<p role="alert">{{ error }}</p>{% endif %}
    <form method="post" action="/api/auth/login">
        <input type="hidden" name="callbackUrl" value="{{ callback_url }}">
        <label>Email <input type="email" name="email" autocomplete="username" required></label>
        <label>Password <input type="password" name="password" autocomplete="current-password" required></label>
        <button type="submit">Sign in</button>
    </form>
</main>
</body>
</html>"#,
    ext = "html"
)]
struct LoginPage<'a> {
    callback_url: &'a str,
    error: Option<&'a str>,
}

async fn login_page_handler(Query(query): Query<LoginPageQuery>) -> Result<Html<String>> {
    let page = LoginPage {
        callback_url: safe_callback(query.callback_url.as_deref()),
        error: query.error.as_deref(),
    };

    page.render()
        .map(Html)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

async fn login_handler<R>(
    State(state): State<AppState<R>>,
    connection_info: ConnectionInfo,
    payload: Payload<LoginRequest>,
) -> Response
where
    R: RepositoryProvider,
{
    let is_form = payload.is_form();
    let request = payload.into_inner();
    let callback = safe_callback(request.callback_url.as_deref());

    let result = if request.email.trim().is_empty() || request.password.is_empty() {
        Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ))
    } else {
        state
            .folio
            .login(
                &request.email,
                &request.password,
                connection_info.user_agent,
                connection_info.ip,
            )
            .await
            .map_err(ApiError::from)
    };

    match (result, is_form) {
        (Ok((user, session)), is_form) => {
            let cookie = session_cookie(&state.cookie_config, session.token.as_str());
            let headers = [(header::SET_COOKIE, cookie.to_string())];
            if is_form {
                (headers, Redirect::to(callback)).into_response()
            } else {
                let body = SessionResponse {
                    user,
                    expires_at: session.expires_at,
                };
                (headers, Json(body)).into_response()
            }
        }
        (Err(e), true) => {
            if let ApiError::Internal(ref detail) = e {
                tracing::error!(error = %detail, "Login failed");
            }
            let location = state.gate.login_url(&[
                ("error", e.public_message()),
                ("callbackUrl", callback),
            ]);
            Redirect::to(&location).into_response()
        }
        (Err(e), false) => e.into_response(),
    }
}

async fn logout_handler<R>(
    State(state): State<AppState<R>>,
    jar: CookieJar,
    SessionTokenFromRequest(session_token): SessionTokenFromRequest,
) -> impl IntoResponse
where
    R: RepositoryProvider,
{
    if let Some(session_token) = session_token {
        if let Err(e) = state.folio.logout(&session_token).await {
            tracing::warn!(error = %e, "Failed to delete session on logout");
        }
    }

    let removal = Cookie::build((state.cookie_config.name.clone(), ""))
        .path(state.cookie_config.path.clone())
        .build();
    let jar = jar.remove(removal);

    (
        jar,
        Json(MessageResponse {
            message: "Successfully logged out".to_string(),
        }),
    )
}

async fn session_handler<R>(
    State(state): State<AppState<R>>,
    SessionTokenFromRequest(session_token): SessionTokenFromRequest,
) -> Result<Json<SessionResponse>>
where
    R: RepositoryProvider,
{
    let session_token = session_token.ok_or(ApiError::Unauthorized)?;
    let (user, session) = state
        .folio
        .authenticate(&session_token)
        .await
        .map_err(|_| ApiError::Unauthorized)?;

    Ok(Json(SessionResponse {
        user,
        expires_at: session.expires_at,
    }))
}

fn session_cookie(config: &CookieConfig, token: &str) -> Cookie<'static> {
    let same_site = match config.same_site {
        CookieSameSite::Strict => SameSite::Strict,
        CookieSameSite::Lax => SameSite::Lax,
        CookieSameSite::None => SameSite::None,
    };

    Cookie::build((config.name.clone(), token.to_string()))
        .path(config.path.clone())
        .http_only(config.http_only)
        .secure(config.secure)
        .same_site(same_site)
        .build()
}

/// Only same-site relative paths are followed after login; anything else lands on the
/// dashboard.
fn safe_callback(callback: Option<&str>) -> &str {
    match callback {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') =>
        {
            path
        }
        _ => DEFAULT_CALLBACK,
    }
}
