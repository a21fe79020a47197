//! One-shot flash messages.
//!
//! A handler that redirects stores messages in the `scriptorium_flash`
//! cookie; the next rendered view reads them through the [`Flashes`]
//! extractor and expires the cookie.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::cookies;

/// Name of the cookie carrying pending flash messages.
pub const FLASH_COOKIE: &str = "scriptorium_flash";

/// Pending messages survive at most this long without being displayed.
const FLASH_MAX_AGE_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

impl Flash {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            category: "message".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            category: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Messages flashed by the previous request, oldest first.
#[derive(Debug, Default)]
pub struct Flashes(pub Vec<Flash>);

impl<S: Send + Sync> FromRequestParts<S> for Flashes {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pending = cookies::get(&parts.headers, FLASH_COOKIE)
            .and_then(|raw| decode(&raw))
            .unwrap_or_default();
        Ok(Flashes(pending))
    }
}

/// `Set-Cookie` value queueing `flashes` for the next rendered view.
pub fn store(flashes: &[Flash], secure: bool) -> HeaderValue {
    match serde_json::to_string(flashes) {
        Ok(json) => cookies::set(
            FLASH_COOKIE,
            &urlencoding::encode(&json),
            FLASH_MAX_AGE_SECS,
            secure,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Dropping unserializable flash messages");
            consume()
        }
    }
}

/// `Set-Cookie` value discarding any pending messages.
pub fn consume() -> HeaderValue {
    cookies::expire(FLASH_COOKIE)
}

fn decode(raw: &str) -> Option<Vec<Flash>> {
    let json = urlencoding::decode(raw).ok()?;
    serde_json::from_str(&json).ok()
}
