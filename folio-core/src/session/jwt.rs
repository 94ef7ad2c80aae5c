//! Stateless JWT sessions. Nothing is stored server side; logging out just drops the cookie.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    error::{CryptoError, SessionError, ValidationError},
    user::UserId,
};

use super::{MIN_SECRET_LEN, Session, SessionProvider, SessionToken};

/// HS256 signing configuration.
#[derive(Clone)]
pub struct JwtConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    /// Issuer claim, required on verification when set.
    pub issuer: Option<String>,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[redacted]")
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtConfig {
    /// Create a configuration from a shared secret of at least [`MIN_SECRET_LEN`] bytes.
    pub fn new_hs256(secret: Vec<u8>) -> Result<Self, Error> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(ValidationError::InvalidField(format!(
                "Session secret must be at least {MIN_SECRET_LEN} bytes"
            ))
            .into());
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
            issuer: None,
        })
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
            validation.set_required_spec_claims(&["exp", "iss"]);
        }
        validation
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    iat: i64,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ua: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ip: Option<String>,
}

pub struct JwtSessionProvider {
    config: JwtConfig,
}

impl JwtSessionProvider {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    fn sign(&self, session: &Session) -> Result<SessionToken, Error> {
        let claims = SessionClaims {
            sub: session.user_id.to_string(),
            iat: session.created_at.timestamp(),
            exp: session.expires_at.timestamp(),
            iss: self.config.issuer.clone(),
            ua: session.user_agent.clone(),
            ip: session.ip_address.clone(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.config.encoding)
            .map(SessionToken::new)
            .map_err(|e| CryptoError::JwtSigning(e.to_string()).into())
    }

    fn verify(&self, token: &SessionToken) -> Result<SessionClaims, Error> {
        let data = jsonwebtoken::decode::<SessionClaims>(
            token.as_str(),
            &self.config.decoding,
            &self.config.validation(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::InvalidToken(e.to_string()),
        })?;

        Ok(data.claims)
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| SessionError::InvalidToken(format!("timestamp {seconds} out of range")).into())
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn create_session(
        &self,
        user_id: &UserId,
        user_agent: Option<String>,
        ip_address: Option<String>,
        duration: Duration,
    ) -> Result<Session, Error> {
        let session = Session::starting_at(user_id.clone(), Utc::now(), duration)
            .with_client(user_agent, ip_address);
        let token = self.sign(&session)?;

        Ok(Session { token, ..session })
    }

    async fn get_session(&self, token: &SessionToken) -> Result<Session, Error> {
        let claims = self.verify(token)?;

        Ok(Session {
            token: token.clone(),
            user_id: UserId::new(&claims.sub),
            user_agent: claims.ua,
            ip_address: claims.ip,
            created_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }

    async fn delete_session(&self, _token: &SessionToken) -> Result<(), Error> {
        Ok(())
    }
}
