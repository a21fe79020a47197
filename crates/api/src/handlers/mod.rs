pub mod assign;
pub mod auth;
pub mod edit;
pub mod pages;

use axum::http::header::{HOST, SET_COOKIE};
use axum::http::{HeaderMap, Uri};
use axum::response::{IntoResponse, Redirect, Response};

use crate::flash::{self, Flash};

/// Network location the client addressed, as used for same-origin checks.
pub(crate) fn request_host(headers: &HeaderMap, uri: &Uri) -> String {
    headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.as_str().to_string()))
        .unwrap_or_default()
}

/// 303 redirect to `to` that queues `flashes` for the next rendered view.
pub(crate) fn redirect_with_flashes(to: &str, flashes: &[Flash], secure: bool) -> Response {
    (
        [(SET_COOKIE, flash::store(flashes, secure))],
        Redirect::to(to),
    )
        .into_response()
}
