//! Route definitions for logging in and out.

use axum::routing::get;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// GET  /login    -> login_page
/// POST /login    -> login
/// GET  /logout   -> logout (requires login)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
}
