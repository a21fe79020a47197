use axum::extract::State;
use axum::{routing::get, Json, Router};
use scriptorium_db::models::page::Progress;
use scriptorium_db::repositories::PageRepo;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Page completion counts; absent when the database cannot be read.
    pub pages: Option<PageCounts>,
}

#[derive(Serialize)]
pub struct PageCounts {
    pub total: i64,
    pub finished: i64,
    pub remaining: i64,
}

impl From<Progress> for PageCounts {
    fn from(progress: Progress) -> Self {
        Self {
            total: progress.total,
            finished: progress.finished,
            remaining: progress.remaining(),
        }
    }
}

/// GET /health
///
/// Reports whether the database answers and how far the correction work
/// has got. Always 200; a broken database shows up as `"degraded"`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = scriptorium_db::health_check(&state.pool).await.is_ok();

    let pages = if db_healthy {
        match PageRepo::progress(&state.pool).await {
            Ok(progress) => Some(PageCounts::from(progress)),
            Err(e) => {
                tracing::warn!(error = %e, "Health check could not count pages");
                None
            }
        }
    } else {
        None
    };

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        pages,
    })
}

/// Mount the health check route.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
