pub mod auth;
pub mod health;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree (everything except `/health` and the
/// static image files).
///
/// All routes except `/login` require a session; requests without one are
/// redirected to `/login?next=<path>`.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(pages::router())
}
