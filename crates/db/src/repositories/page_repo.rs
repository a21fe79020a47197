//! Repository for the `pages` table.

use scriptorium_core::types::DbId;

use crate::models::page::{CreatePage, Page, PageImport, Progress, UpdatePageInfo};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, shelfmark, document, sequence, page_type, handwriting, bad_crop, \
                       page_issue, issue_description, is_finished, created_at, updated_at";

/// Provides CRUD operations for pages.
pub struct PageRepo;

impl PageRepo {
    /// Insert a new page, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreatePage) -> Result<Page, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages (id, shelfmark, document, sequence)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(&input.id)
            .bind(&input.shelfmark)
            .bind(&input.document)
            .bind(&input.sequence)
            .fetch_one(pool)
            .await
    }

    /// Insert every page of an import together with its lines in one
    /// transaction. Each line's corrected text starts equal to its OCR text.
    ///
    /// On any error (for example a page id that already exists) nothing is
    /// written. Returns the number of lines inserted.
    pub async fn import(pool: &DbPool, pages: &[PageImport]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut line_count = 0;

        for page in pages {
            sqlx::query(
                "INSERT INTO pages (id, shelfmark, document, sequence) VALUES ($1, $2, $3, $4)",
            )
            .bind(&page.id)
            .bind(&page.shelfmark)
            .bind(&page.document)
            .bind(&page.sequence)
            .execute(&mut *tx)
            .await?;

            for (position, ocr) in page.lines.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO lines (page_id, position, ocr, corrected) VALUES ($1, $2, $3, $3)",
                )
                .bind(&page.id)
                .bind(position as i64)
                .bind(ocr)
                .execute(&mut *tx)
                .await?;
            }

            line_count += page.lines.len() as u64;
        }

        tx.commit().await?;
        tracing::debug!(pages = pages.len(), lines = line_count, "Imported pages");
        Ok(line_count)
    }

    /// Find a page by ID.
    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Write back the stage-1 classification.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_info(
        pool: &DbPool,
        id: &str,
        input: &UpdatePageInfo,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET
                page_type = $2,
                handwriting = $3,
                bad_crop = $4,
                page_issue = $5,
                issue_description = $6,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(&input.page_type)
            .bind(input.handwriting)
            .bind(input.bad_crop)
            .bind(input.page_issue)
            .bind(&input.issue_description)
            .fetch_optional(pool)
            .await
    }

    /// Mark the page finished and clear the finishing user's position in
    /// one transaction.
    ///
    /// Returns `false` if the page does not exist.
    pub async fn finalise(pool: &DbPool, id: &str, user_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE pages SET is_finished = 1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE users SET current_page_id = NULL, current_stage = NULL WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// IDs of every page still awaiting correction.
    pub async fn list_unfinished_ids(pool: &DbPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT id FROM pages WHERE is_finished = 0 ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Total and finished page counts.
    pub async fn progress(pool: &DbPool) -> Result<Progress, sqlx::Error> {
        sqlx::query_as::<_, Progress>(
            "SELECT COUNT(*) AS total, COALESCE(SUM(is_finished), 0) AS finished FROM pages",
        )
        .fetch_one(pool)
        .await
    }

    /// Delete a page; its lines are removed by the foreign key cascade.
    ///
    /// Returns `true` if the row was deleted.
    pub async fn delete(pool: &DbPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
