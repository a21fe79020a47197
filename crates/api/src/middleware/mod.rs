//! Request extractors guarding the editing views.
//!
//! - [`auth::CurrentUser`] -- the logged-in user, from the session cookie.

pub mod auth;
