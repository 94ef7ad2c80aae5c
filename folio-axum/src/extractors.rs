use std::net::SocketAddr;

use axum::{
    Form, Json, RequestPartsExt,
    extract::{ConnectInfo, FromRequest, FromRequestParts, Request},
    http::{StatusCode, header, request::Parts},
};
use axum_extra::{TypedHeader, extract::CookieJar, headers::UserAgent};
use folio::{RepositoryProvider, SessionToken, User};
use serde::de::DeserializeOwned;

use crate::{
    error::ApiError,
    middleware::{AppState, session_token},
    types::ConnectionInfo,
};

impl<S> FromRequestParts<S> for ConnectionInfo
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .extract::<Option<TypedHeader<UserAgent>>>()
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid user agent header"))?
            .map(|ua| ua.to_string());

        let ip = parts
            .extract::<ConnectInfo<SocketAddr>>()
            .await
            .ok()
            .map(|addr| addr.ip().to_string());

        Ok(ConnectionInfo { ip, user_agent })
    }
}

/// The signed-in user, placed in the request by the access gate.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or(ApiError::Unauthorized)?;

        Ok(AuthUser(user))
    }
}

/// A signed-in user with the admin role.
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!(user_id = %user.id, role = %user.role, "Admin API refused");
            return Err(ApiError::Forbidden);
        }

        Ok(AdminUser(user))
    }
}

/// Session token from the `Authorization` header or the configured session cookie.
pub struct SessionTokenFromRequest(pub Option<SessionToken>);

impl<R> FromRequestParts<AppState<R>> for SessionTokenFromRequest
where
    R: RepositoryProvider,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<R>,
    ) -> Result<Self, Self::Rejection> {
        let jar = parts
            .extract::<CookieJar>()
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid cookie header"))?;

        Ok(SessionTokenFromRequest(session_token(
            &parts.headers,
            &jar,
            &state.cookie_config.name,
        )))
    }
}

/// A body accepted either as JSON or as an urlencoded HTML form post.
///
/// Which one is decided by the `Content-Type` header; anything that is not a form is read
/// as JSON.
#[derive(Debug)]
pub enum Payload<T> {
    Json(T),
    Form(T),
}

impl<T> Payload<T> {
    pub fn is_form(&self) -> bool {
        matches!(self, Payload::Form(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Payload::Json(value) | Payload::Form(value) => value,
        }
    }
}

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Payload::Form(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Payload::Json(value))
        }
    }
}
