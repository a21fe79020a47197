//! Shared response envelope for rendered views.
//!
//! Every view is returned as `{ "data": ..., "flashes": [...] }`. Rendering a
//! view displays the pending flash messages, so the flash cookie is always
//! expired on the way out.

use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::flash::{self, Flash};

/// Standard `{ "data": T, "flashes": [...] }` view envelope.
#[derive(Debug, Serialize)]
pub struct View<T: Serialize> {
    pub data: T,
    pub flashes: Vec<Flash>,
}

/// Render `data` with the given flashes, consuming the flash cookie.
pub fn render<T: Serialize>(data: T, flashes: Vec<Flash>) -> Response {
    (
        [(SET_COOKIE, flash::consume())],
        Json(View { data, flashes }),
    )
        .into_response()
}
