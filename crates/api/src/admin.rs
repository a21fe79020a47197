//! Account and page management behind the `scriptorium-admin` binary.
//!
//! Users and pages are never created through the web interface. These
//! functions hold the rules; the binary only parses arguments, reads files
//! and prints.

use std::collections::HashSet;

use scriptorium_core::error::CoreError;
use scriptorium_core::line::validate_line_text;
use scriptorium_core::page::validate_page_id;
use scriptorium_db::models::page::{PageImport, Progress};
use scriptorium_db::models::user::{CreateUser, User};
use scriptorium_db::repositories::{PageRepo, UserRepo};
use scriptorium_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Malformed import file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Details for a new collaborator account.
#[derive(Debug)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

/// Counts reported after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub pages: usize,
    pub lines: u64,
}

/// Create an account after checking the username and password strength.
pub async fn create_user(pool: &DbPool, account: NewAccount) -> Result<User, AdminError> {
    if account.username.trim().is_empty() {
        return Err(CoreError::Validation("Username must not be empty".into()).into());
    }
    validate_password_strength(&account.password).map_err(CoreError::Validation)?;

    let password_hash =
        hash_password(&account.password).map_err(|e| AdminError::Hash(e.to_string()))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: account.username,
            email: account.email,
            password_hash,
            is_admin: account.is_admin,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        is_admin = user.is_admin,
        "Created user"
    );
    Ok(user)
}

/// Parse the JSON array of an import file.
pub fn parse_import(raw: &str) -> Result<Vec<PageImport>, AdminError> {
    Ok(serde_json::from_str(raw)?)
}

/// Check every entry of an import before anything is written: page ids
/// must be valid and unique within the file, and every line must fit.
pub fn validate_import(pages: &[PageImport]) -> Result<(), CoreError> {
    let mut seen = HashSet::new();

    for page in pages {
        validate_page_id(&page.id)?;
        if !seen.insert(page.id.as_str()) {
            return Err(CoreError::Conflict(format!(
                "Page id '{}' appears more than once in the import",
                page.id
            )));
        }
        for (position, text) in page.lines.iter().enumerate() {
            validate_line_text(position as i64, text).map_err(|e| match e {
                CoreError::Validation(msg) => {
                    CoreError::Validation(format!("Page '{}': {msg}", page.id))
                }
                other => other,
            })?;
        }
    }

    Ok(())
}

/// Validate and insert a whole import file. Either every page is stored or
/// none is.
pub async fn import_pages(
    pool: &DbPool,
    pages: &[PageImport],
) -> Result<ImportSummary, AdminError> {
    validate_import(pages)?;

    let lines = PageRepo::import(pool, pages).await?;

    tracing::info!(pages = pages.len(), lines, "Imported pages");
    Ok(ImportSummary {
        pages: pages.len(),
        lines,
    })
}

/// One-line progress report for the operator.
pub fn describe_progress(progress: &Progress) -> String {
    format!(
        "{} of {} pages finished ({} remaining)",
        progress.finished,
        progress.total,
        progress.remaining()
    )
}
