//! Hand out work: send the user to some page that still needs correcting.

use axum::extract::State;
use axum::response::Redirect;
use scriptorium_core::assignment::pick_page;
use scriptorium_core::workflow::Stage;
use scriptorium_db::repositories::PageRepo;

use crate::error::AppResult;
use crate::forms::stage_url;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// Index URL shown when every page is finished.
const NO_PAGES_URL: &str = "/?no_pages=1";

/// GET|POST /getpage
pub async fn get_page(State(state): State<AppState>, current: CurrentUser) -> AppResult<Redirect> {
    let unfinished = PageRepo::list_unfinished_ids(&state.pool).await?;

    let picked = {
        let mut rng = rand::rng();
        pick_page(&unfinished, &mut rng).map(str::to_string)
    };

    match picked {
        Some(page_id) => {
            tracing::debug!(user_id = current.user.id, %page_id, "Assigned page");
            Ok(Redirect::to(&stage_url(&page_id, Stage::PageInfo)))
        }
        None => {
            tracing::info!(user_id = current.user.id, "No unfinished pages left to assign");
            Ok(Redirect::to(NO_PAGES_URL))
        }
    }
}
