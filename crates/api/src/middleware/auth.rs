//! Session-cookie authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use scriptorium_db::models::user::User;
use scriptorium_db::repositories::UserRepo;

use crate::auth::csrf;
use crate::auth::session::{validate_token, SESSION_COOKIE};
use crate::config::ServerConfig;
use crate::cookies;
use crate::error::{AppError, AppResult};
use crate::forms::FormData;
use crate::state::AppState;

/// The logged-in user behind the `scriptorium_session` cookie.
///
/// Requests without a valid session are redirected to the login page with
/// `next` set to the requested path:
///
/// ```ignore
/// async fn my_handler(current: CurrentUser) -> AppResult<Response> {
///     tracing::info!(user_id = current.user.id, "handling request");
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// Random id of this login session; CSRF tokens are bound to it.
    pub session_id: String,
}

impl CurrentUser {
    /// CSRF token to embed in forms rendered for this session.
    pub fn csrf_token(&self, config: &ServerConfig) -> String {
        csrf::issue(&config.session.secret, &self.session_id)
    }

    /// Reject a form submission whose CSRF token doesn't match the session.
    pub fn check_csrf(&self, config: &ServerConfig, data: &FormData) -> AppResult<()> {
        let submitted = data.get(csrf::CSRF_FIELD).unwrap_or_default();
        if csrf::verify(&config.session.secret, &self.session_id, submitted) {
            Ok(())
        } else {
            tracing::warn!(user_id = self.user.id, "Rejected form with bad CSRF token");
            Err(AppError::BadRequest("The CSRF token is missing or invalid".into()))
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let login_required = || AppError::LoginRequired {
            next: parts
                .uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| "/".to_string()),
        };

        let token = cookies::get(&parts.headers, SESSION_COOKIE).ok_or_else(login_required)?;

        let claims = validate_token(&token, &state.config.session).map_err(|e| {
            tracing::debug!(error = %e, "Ignoring invalid session cookie");
            login_required()
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(login_required)?;

        Ok(CurrentUser {
            user,
            session_id: claims.jti,
        })
    }
}
