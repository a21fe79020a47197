//! Read-only views: the index dashboard and the page viewer.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use scriptorium_db::models::page::PageWithLines;
use scriptorium_db::models::user::{EditorPosition, UserResponse};
use scriptorium_db::repositories::{LineRepo, PageRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::flash::Flashes;
use crate::forms;
use crate::middleware::auth::CurrentUser;
use crate::response::render;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// Query parameters accepted by `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub no_pages: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProgressView {
    pub total: i64,
    pub finished: i64,
    pub remaining: i64,
}

#[derive(Debug, Serialize)]
pub struct IndexView {
    pub user: UserResponse,
    pub progress: ProgressView,
    /// Everyone with an open page, including the current user.
    pub editors: Vec<EditorPosition>,
    /// Set after `/getpage` found nothing left to correct.
    pub no_pages: bool,
}

#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: PageWithLines,
    pub form: forms::Form,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /
pub async fn index(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<IndexQuery>,
    Flashes(flashes): Flashes,
) -> AppResult<Response> {
    let progress = PageRepo::progress(&state.pool).await?;
    let editors = UserRepo::list_positions(&state.pool).await?;

    let no_pages = query.no_pages.is_some_and(|value| !value.is_empty());

    Ok(render(
        IndexView {
            user: UserResponse::from(&current.user),
            progress: ProgressView {
                total: progress.total,
                finished: progress.finished,
                remaining: progress.remaining(),
            },
            editors,
            no_pages,
        },
        flashes,
    ))
}

/// GET /view/{page_id}
pub async fn view(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(page_id): Path<String>,
    Flashes(flashes): Flashes,
) -> AppResult<Response> {
    let page = PageRepo::find_by_id(&state.pool, &page_id)
        .await?
        .ok_or_else(|| AppError::not_found("Page", &page_id))?;
    let lines = LineRepo::list_by_page(&state.pool, &page_id).await?;

    let csrf_token = current.csrf_token(&state.config);

    Ok(render(
        PageView {
            form: forms::review_form(&page.id, &csrf_token),
            page: PageWithLines::new(page, lines),
        },
        flashes,
    ))
}
