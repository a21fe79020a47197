//! Per-session CSRF tokens for the editing forms.
//!
//! The token is `hex(HMAC-SHA256(secret, session id))`: stable for the life
//! of a session, unguessable without the server secret, and never stored.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Name of the hidden form field carrying the token.
pub const CSRF_FIELD: &str = "csrf_token";

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &str, session_id: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(session_id.as_bytes());
    mac
}

/// Token to embed in forms rendered for `session_id`.
pub fn issue(secret: &str, session_id: &str) -> String {
    hex::encode(mac(secret, session_id).finalize().into_bytes())
}

/// Constant-time check of a submitted token.
pub fn verify(secret: &str, session_id: &str, submitted: &str) -> bool {
    match hex::decode(submitted) {
        Ok(bytes) => mac(secret, session_id).verify_slice(&bytes).is_ok(),
        Err(_) => false,
    }
}
