//! User entity model and DTOs.

use scriptorium_core::types::{DbId, PageId, Timestamp};
use scriptorium_core::workflow::Stage;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub current_page_id: Option<PageId>,
    pub current_stage: Option<i64>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl User {
    /// The page and stage this user last opened, if any.
    pub fn position(&self) -> Option<Position> {
        let page_id = self.current_page_id.clone()?;
        let stage = self.current_stage.and_then(Stage::from_number)?;
        Some(Position { page_id, stage })
    }
}

/// Where a user currently is in the editing workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub page_id: PageId,
    pub stage: Stage,
}

/// Safe user representation for responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub position: Option<Position>,
    pub last_login_at: Option<Timestamp>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            position: user.position(),
            last_login_at: user.last_login_at,
        }
    }
}

/// A collaborator's position, joined with their username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EditorPosition {
    pub user_id: DbId,
    pub username: String,
    pub page_id: PageId,
    pub stage: i64,
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}
