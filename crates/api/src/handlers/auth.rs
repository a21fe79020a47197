//! Handlers for logging in and out.

use axum::extract::{Query, State};
use axum::http::header::{REFERER, SET_COOKIE};
use axum::http::{HeaderMap, Uri};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Form;
use scriptorium_core::redirect::{is_safe_url, redirect_target};
use scriptorium_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::password::verify_password;
use crate::auth::session::{issue_token, SESSION_COOKIE};
use crate::cookies;
use crate::error::{AppError, AppResult};
use crate::flash::{self, Flash, Flashes};
use crate::forms::{self, FormData};
use crate::handlers::request_host;
use crate::middleware::auth::CurrentUser;
use crate::response::render;
use crate::state::AppState;

/// Query parameters accepted by `GET /login`.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginView {
    pub form: forms::Form,
}

/// GET /login
///
/// The hidden `next` field is pre-filled from `?next=` or the referrer,
/// whichever is the first safe candidate.
pub async fn login_page(
    Query(query): Query<LoginQuery>,
    headers: HeaderMap,
    uri: Uri,
    Flashes(flashes): Flashes,
) -> Response {
    let host = request_host(&headers, &uri);
    let referrer = headers.get(REFERER).and_then(|v| v.to_str().ok());
    let next = redirect_target(query.next.as_deref(), referrer, &host).unwrap_or_default();

    render(
        LoginView {
            form: forms::login_form("", &next),
        },
        flashes,
    )
}

/// POST /login
///
/// Wrong credentials re-render the form with an error flash and change
/// nothing. A valid login with an unsafe `next` is refused with 400 before
/// any session is issued.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Flashes(mut flashes): Flashes,
    Form(data): Form<FormData>,
) -> AppResult<Response> {
    let username = data.get("username").unwrap_or_default();
    let password = data.get("password").unwrap_or_default();
    let next = data.get("next").unwrap_or_default();

    let user = UserRepo::find_by_username(&state.pool, username).await?;

    let authenticated = match &user {
        Some(user) => verify_password(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?,
        None => false,
    };

    let user = match user {
        Some(user) if authenticated => user,
        _ => {
            tracing::info!(username, "Failed login attempt");
            flashes.push(Flash::error("Incorrect username or password."));
            return Ok(render(
                LoginView {
                    form: forms::login_form(username, next),
                },
                flashes,
            ));
        }
    };

    let host = request_host(&headers, &uri);
    if !is_safe_url(next, &host) {
        tracing::warn!(user_id = user.id, next, "Refusing unsafe post-login redirect");
        return Err(AppError::BadRequest(format!("Unsafe redirect target '{next}'")));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let session = &state.config.session;
    let token = issue_token(user.id, session)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    flashes.push(Flash::message("Logged in successfully."));
    let destination = if next.is_empty() { "/" } else { next };

    Ok((
        AppendHeaders([
            (
                SET_COOKIE,
                cookies::set(
                    SESSION_COOKIE,
                    &token,
                    session.max_age_secs(),
                    session.cookie_secure,
                ),
            ),
            (SET_COOKIE, flash::store(&flashes, session.cookie_secure)),
        ]),
        Redirect::to(destination),
    )
        .into_response())
}

/// GET /logout
///
/// Expires the session cookie and forgets the user's editing position.
pub async fn logout(State(state): State<AppState>, current: CurrentUser) -> AppResult<Response> {
    UserRepo::clear_position(&state.pool, current.user.id).await?;

    tracing::info!(user_id = current.user.id, "User logged out");

    Ok((
        [(SET_COOKIE, cookies::expire(SESSION_COOKIE))],
        "Logged out",
    )
        .into_response())
}
