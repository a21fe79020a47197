//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- signed session tokens carried in the session cookie.
//! - [`csrf`] -- per-session form tokens.

pub mod csrf;
pub mod password;
pub mod session;
