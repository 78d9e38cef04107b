pub mod error;
pub mod password;
pub mod session;
pub mod user;

use crate::auth::AuthConfigArguments;
use error::AuthenticationError;
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use std::{sync::Arc, time::Duration};
use time::OffsetDateTime;
use user::UserDetails;

/// The name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "venter_session";

/// The claims of a session token.
///
/// Only the identity of the user is carried, role and organisation are loaded per request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    /// The user id
    pub sub: String,
    pub username: String,
    /// The session generation of the user at the time of issuing
    pub ver: i32,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i32, AuthenticationError> {
        self.sub.parse().map_err(|_| AuthenticationError::Failed)
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and validates session tokens.
///
/// Tokens are HS256 signed JWTs. A valid token is only a claim, see [`session::resolve`] for
/// turning it into the [`UserDetails`] of the request.
#[derive(Clone)]
pub struct Authenticator {
    keys: Arc<Keys>,
    ttl: Duration,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfigArguments) -> Self {
        if config.is_development_secret() {
            log::warn!("Using the development session secret, set VENTER_SESSION_SECRET for production use");
        }
        Self::new(config.session_secret.as_bytes(), config.session_ttl())
    }

    /// The lifetime of issued sessions.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a new session token for a user.
    pub fn issue(&self, user: &UserDetails) -> Result<String, AuthenticationError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            ver: user.session,
            iat: now,
            exp: now.saturating_add(self.ttl.as_secs().try_into().unwrap_or(i64::MAX)),
        };

        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String, AuthenticationError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.keys.encoding)
            .map_err(|err| AuthenticationError::Issue(err.to_string()))
    }

    /// Check the signature and expiry of a session token, returning its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthenticationError> {
        let validation = Validation::new(Algorithm::HS256);
        let TokenData { claims, .. } =
            decode::<Claims>(token, &self.keys.decoding, &validation)?;

        claims.user_id()?;

        Ok(claims)
    }
}
