//! Repository for the `users` table.

use scriptorium_core::types::DbId;
use scriptorium_core::workflow::Stage;

use crate::models::user::{CreateUser, EditorPosition, User};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, is_admin, \
                       current_page_id, current_stage, last_login_at, created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, is_admin)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.is_admin)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &DbPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Set `last_login_at` to now.
    pub async fn record_successful_login(pool: &DbPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET last_login_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record the page and stage the user is currently viewing.
    pub async fn set_position(
        pool: &DbPool,
        id: DbId,
        page_id: &str,
        stage: Stage,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET current_page_id = $2, current_stage = $3 WHERE id = $1")
            .bind(id)
            .bind(page_id)
            .bind(stage.number())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Forget the user's current position. Returns `true` if one was set.
    pub async fn clear_position(pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET current_page_id = NULL, current_stage = NULL
             WHERE id = $1 AND current_page_id IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Everyone who currently has a page open, ordered by page then username.
    pub async fn list_positions(pool: &DbPool) -> Result<Vec<EditorPosition>, sqlx::Error> {
        sqlx::query_as::<_, EditorPosition>(
            "SELECT id AS user_id, username, current_page_id AS page_id, current_stage AS stage
             FROM users
             WHERE current_page_id IS NOT NULL AND current_stage IS NOT NULL
             ORDER BY current_page_id, username",
        )
        .fetch_all(pool)
        .await
    }

    /// Other users currently on `page_id`, excluding `exclude_user_id`.
    pub async fn list_editors_of_page(
        pool: &DbPool,
        page_id: &str,
        exclude_user_id: DbId,
    ) -> Result<Vec<EditorPosition>, sqlx::Error> {
        sqlx::query_as::<_, EditorPosition>(
            "SELECT id AS user_id, username, current_page_id AS page_id, current_stage AS stage
             FROM users
             WHERE current_page_id = $1 AND current_stage IS NOT NULL AND id <> $2
             ORDER BY username",
        )
        .bind(page_id)
        .bind(exclude_user_id)
        .fetch_all(pool)
        .await
    }
}
