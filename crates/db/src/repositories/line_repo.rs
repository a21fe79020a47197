//! Repository for the `lines` table.

use crate::models::line::{CreateLine, Line, LineCorrection};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, page_id, position, ocr, corrected, is_marginalia, not_found";

/// Provides CRUD operations for lines.
pub struct LineRepo;

impl LineRepo {
    /// Insert a new line, returning the created row.
    ///
    /// When `corrected` is omitted the line starts out equal to its OCR text.
    pub async fn create(pool: &DbPool, input: &CreateLine) -> Result<Line, sqlx::Error> {
        let query = format!(
            "INSERT INTO lines (page_id, position, ocr, corrected)
             VALUES ($1, $2, $3, COALESCE($4, $3))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Line>(&query)
            .bind(&input.page_id)
            .bind(input.position)
            .bind(&input.ocr)
            .bind(&input.corrected)
            .fetch_one(pool)
            .await
    }

    /// All lines of a page in reading order.
    pub async fn list_by_page(pool: &DbPool, page_id: &str) -> Result<Vec<Line>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lines WHERE page_id = $1 ORDER BY position");
        sqlx::query_as::<_, Line>(&query)
            .bind(page_id)
            .fetch_all(pool)
            .await
    }

    /// Write every correction for a page in a single transaction.
    ///
    /// Returns the number of lines updated. Corrections for positions the
    /// page does not have are ignored.
    pub async fn apply_corrections(
        pool: &DbPool,
        page_id: &str,
        corrections: &[LineCorrection],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0;

        for correction in corrections {
            let result = sqlx::query(
                "UPDATE lines SET corrected = $3, is_marginalia = $4, not_found = $5
                 WHERE page_id = $1 AND position = $2",
            )
            .bind(page_id)
            .bind(correction.position)
            .bind(&correction.corrected)
            .bind(correction.is_marginalia)
            .bind(correction.not_found)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }

        tx.commit().await?;
        tracing::debug!(page_id, updated, "Applied line corrections");
        Ok(updated)
    }
}
