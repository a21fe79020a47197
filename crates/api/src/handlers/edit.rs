//! Handlers for the three-stage page editing workflow.
//!
//! Viewing a stage records `(page, stage)` on the user so the index and the
//! other editors of the page can see where everyone is. Submitting a stage
//! writes the form back and redirects to wherever [`Stage::next`] leads.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use scriptorium_core::workflow::{Stage, Submit, Transition};
use scriptorium_db::models::page::{Page, PageWithLines};
use scriptorium_db::models::user::EditorPosition;
use scriptorium_db::repositories::{LineRepo, PageRepo, UserRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::flash::{Flash, Flashes};
use crate::forms::{self, stage_url, FormData};
use crate::handlers::redirect_with_flashes;
use crate::middleware::auth::CurrentUser;
use crate::response::render;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct EditView {
    pub stage: Stage,
    pub page: PageWithLines,
    pub form: forms::Form,
    /// Other users who currently have this page open.
    pub editors: Vec<EditorPosition>,
}

async fn load_page(state: &AppState, page_id: &str) -> AppResult<Page> {
    PageRepo::find_by_id(&state.pool, page_id)
        .await?
        .ok_or_else(|| AppError::not_found("Page", page_id))
}

/// GET /edit/{page_id}
pub async fn edit_page(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(page_id): Path<String>,
) -> AppResult<Redirect> {
    let page = load_page(&state, &page_id).await?;
    Ok(Redirect::to(&stage_url(&page.id, Stage::PageInfo)))
}

/// GET /edit/{page_id}/stage{N}
pub async fn show_stage(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((page_id, segment)): Path<(String, String)>,
    Flashes(flashes): Flashes,
) -> AppResult<Response> {
    let page = load_page(&state, &page_id).await?;
    let stage: Stage = segment.parse()?;

    UserRepo::set_position(&state.pool, current.user.id, &page.id, stage).await?;
    let editors = UserRepo::list_editors_of_page(&state.pool, &page.id, current.user.id).await?;
    let lines = LineRepo::list_by_page(&state.pool, &page.id).await?;

    tracing::debug!(
        user_id = current.user.id,
        page_id = %page.id,
        %stage,
        other_editors = editors.len(),
        "Opened page for editing"
    );

    let csrf_token = current.csrf_token(&state.config);
    let form = match stage {
        Stage::PageInfo => forms::page_info_form(&page, &csrf_token),
        Stage::Transcription => forms::transcription_form(&page.id, &lines, &csrf_token),
        Stage::Review => forms::review_form(&page.id, &csrf_token),
    };

    Ok(render(
        EditView {
            stage,
            page: PageWithLines::new(page, lines),
            form,
            editors,
        },
        flashes,
    ))
}

/// POST /edit/{page_id}/stage{N}
pub async fn submit_stage(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((page_id, segment)): Path<(String, String)>,
    Flashes(mut flashes): Flashes,
    Form(data): Form<FormData>,
) -> AppResult<Response> {
    let page = load_page(&state, &page_id).await?;
    let stage: Stage = segment.parse()?;
    current.check_csrf(&state.config, &data)?;

    let submit = match stage {
        Stage::PageInfo => {
            let info = forms::bind_page_info(&data)?;
            PageRepo::update_info(&state.pool, &page.id, &info)
                .await?
                .ok_or_else(|| AppError::not_found("Page", &page.id))?;
            Submit::Default
        }
        Stage::Transcription => {
            let lines = LineRepo::list_by_page(&state.pool, &page.id).await?;
            let (corrections, submit) = forms::bind_transcription(&lines, &data)?;
            LineRepo::apply_corrections(&state.pool, &page.id, &corrections).await?;
            submit
        }
        Stage::Review => forms::review_submit(&data),
    };

    match stage.next(submit) {
        Transition::Edit(next) => {
            tracing::debug!(
                user_id = current.user.id,
                page_id = %page.id,
                from = %stage,
                to = %next,
                "Stage submitted"
            );
            Ok(Redirect::to(&stage_url(&page.id, next)).into_response())
        }
        Transition::Finished => {
            PageRepo::finalise(&state.pool, &page.id, current.user.id).await?;
            tracing::info!(user_id = current.user.id, page_id = %page.id, "Page finalised");
            flashes.push(Flash::message("Record saved"));
            Ok(redirect_with_flashes(
                "/",
                &flashes,
                state.config.session.cookie_secure,
            ))
        }
    }
}
