//! Line entity model and DTOs.

use scriptorium_core::line::has_changes;
use scriptorium_core::types::{DbId, PageId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One OCR-recognised text line from the `lines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Line {
    pub id: DbId,
    pub page_id: PageId,
    pub position: i64,
    pub ocr: String,
    pub corrected: String,
    pub is_marginalia: bool,
    pub not_found: bool,
}

impl Line {
    /// The corrected text differs from what OCR produced.
    pub fn has_changes(&self) -> bool {
        has_changes(&self.ocr, &self.corrected)
    }
}

/// DTO for importing a line. `corrected` defaults to the OCR text.
#[derive(Debug, Deserialize)]
pub struct CreateLine {
    pub page_id: PageId,
    pub position: i64,
    pub ocr: String,
    pub corrected: Option<String>,
}

/// Stage-2 correction for the line at `position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCorrection {
    pub position: i64,
    pub corrected: String,
    pub is_marginalia: bool,
    pub not_found: bool,
}
