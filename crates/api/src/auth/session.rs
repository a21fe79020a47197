//! Signed session tokens.
//!
//! A successful login issues an HS256 token holding the user id and a random
//! session id. The token lives in the `scriptorium_session` cookie; logging
//! out expires the cookie.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use scriptorium_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "scriptorium_session";

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Random session id; CSRF tokens are derived from it.
    pub jti: String,
}

/// Configuration for session tokens and the session cookie.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign tokens and CSRF values.
    pub secret: String,
    /// Session lifetime in minutes (default: 720).
    pub expiry_mins: i64,
    /// Add the `Secure` attribute to cookies (default: false).
    pub cookie_secure: bool,
}

/// Default session lifetime in minutes.
const DEFAULT_EXPIRY_MINS: i64 = 12 * 60;

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `SESSION_SECRET`        | **yes**  | --      |
    /// | `SESSION_EXPIRY_MINS`   | no       | `720`   |
    /// | `SESSION_COOKIE_SECURE` | no       | `false` |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("SESSION_SECRET")
            .expect("SESSION_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SESSION_SECRET must not be empty");

        let expiry_mins: i64 = std::env::var("SESSION_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_MINS.to_string())
            .parse()
            .expect("SESSION_EXPIRY_MINS must be a valid i64");

        let cookie_secure = std::env::var("SESSION_COOKIE_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            secret,
            expiry_mins,
            cookie_secure,
        }
    }

    /// Cookie lifetime in seconds.
    pub fn max_age_secs(&self) -> i64 {
        self.expiry_mins * 60
    }
}

/// Issue a token for a freshly authenticated user.
pub fn issue_token(
    user_id: DbId,
    config: &SessionConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        exp: now + config.max_age_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a session token, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &SessionConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
