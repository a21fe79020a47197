//! Route definitions for browsing and editing pages.

use axum::routing::get;
use axum::Router;

use crate::handlers::{assign, edit, pages};
use crate::state::AppState;

/// ```text
/// GET       /                          index
/// GET       /view/{page_id}            page with lines and review form
/// GET       /edit/{page_id}            redirect to stage 1
/// GET|POST  /edit/{page_id}/{stage}    show / submit stage1..stage3
/// GET|POST  /getpage                   random unfinished page
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/view/{page_id}", get(pages::view))
        .route("/edit/{page_id}", get(edit::edit_page))
        .route(
            "/edit/{page_id}/{stage}",
            get(edit::show_stage).post(edit::submit_stage),
        )
        .route("/getpage", get(assign::get_page).post(assign::get_page))
}
