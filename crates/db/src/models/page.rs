//! Page entity model and DTOs.

use scriptorium_core::page::dirpath;
use scriptorium_core::types::{PageId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::line::Line;

/// A scanned page from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: PageId,
    pub shelfmark: String,
    pub document: String,
    pub sequence: String,
    pub page_type: Option<String>,
    pub handwriting: bool,
    pub bad_crop: bool,
    pub page_issue: bool,
    pub issue_description: Option<String>,
    pub is_finished: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Page {
    /// Any image-quality problem was flagged on this page.
    pub fn has_issue(&self) -> bool {
        self.handwriting || self.bad_crop || self.page_issue
    }

    /// Image directory of this scan, relative to the image root.
    pub fn dirpath(&self) -> String {
        dirpath(&self.shelfmark, &self.document, &self.sequence)
    }
}

/// A page together with its lines, ordered by position.
#[derive(Debug, Clone, Serialize)]
pub struct PageWithLines {
    #[serde(flatten)]
    pub page: Page,
    pub has_issue: bool,
    pub dirpath: String,
    pub lines: Vec<LineView>,
}

impl PageWithLines {
    pub fn new(page: Page, lines: Vec<Line>) -> Self {
        Self {
            has_issue: page.has_issue(),
            dirpath: page.dirpath(),
            lines: lines.into_iter().map(LineView::from).collect(),
            page,
        }
    }
}

/// A line plus its derived change flag.
#[derive(Debug, Clone, Serialize)]
pub struct LineView {
    #[serde(flatten)]
    pub line: Line,
    pub has_changes: bool,
}

impl From<Line> for LineView {
    fn from(line: Line) -> Self {
        Self {
            has_changes: line.has_changes(),
            line,
        }
    }
}

/// Completion counts across all pages.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct Progress {
    pub total: i64,
    pub finished: i64,
}

impl Progress {
    pub fn remaining(&self) -> i64 {
        self.total - self.finished
    }
}

/// DTO for importing a page.
#[derive(Debug, Deserialize)]
pub struct CreatePage {
    pub id: PageId,
    pub shelfmark: String,
    pub document: String,
    pub sequence: String,
}

/// One entry of an import file: a page and the OCR text of its lines.
/// Line positions are the indexes into `lines`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageImport {
    pub id: PageId,
    pub shelfmark: String,
    pub document: String,
    pub sequence: String,
    #[serde(default)]
    pub lines: Vec<String>,
}

/// Stage-1 classification written back from the page information form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePageInfo {
    pub page_type: Option<String>,
    pub handwriting: bool,
    pub bad_crop: bool,
    pub page_issue: bool,
    pub issue_description: Option<String>,
}
