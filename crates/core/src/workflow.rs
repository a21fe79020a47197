//! The three-stage page editing workflow.
//!
//! ```text
//! PageInfo ──submit──▶ Transcription ──save──▶ Transcription
//!                            │
//!                            └──other──▶ Review ──finalise──▶ Finished
//!                                          │
//!                                          ├──stage1──▶ PageInfo
//!                                          └──stage2──▶ Transcription
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// Prefix of the URL path segment naming a stage (`stage1` .. `stage3`).
pub const STAGE_SEGMENT_PREFIX: &str = "stage";

/// One step of the correction workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "i64")]
pub enum Stage {
    /// Stage 1: page type and image-quality flags.
    PageInfo,
    /// Stage 2: per-line correction of the OCR text.
    Transcription,
    /// Stage 3: review and finalise.
    Review,
}

/// Where a submission sends the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Edit(Stage),
    Finished,
}

/// The submit button a form was posted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    /// The plain submit button, or no recognised button at all.
    Default,
    /// "Save and continue" on stage 2.
    Save,
    /// "Finalise" on stage 2, "Complete submission" on stage 3.
    Finalise,
    /// Jump back to an earlier stage from the review screen.
    Revisit(Stage),
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::PageInfo, Stage::Transcription, Stage::Review];

    /// 1-based stage number as stored on the user row and used in URLs.
    pub fn number(self) -> i64 {
        match self {
            Stage::PageInfo => 1,
            Stage::Transcription => 2,
            Stage::Review => 3,
        }
    }

    pub fn from_number(number: i64) -> Option<Self> {
        Stage::ALL.into_iter().find(|stage| stage.number() == number)
    }

    /// Path segment for this stage, e.g. `stage2`.
    pub fn segment(self) -> String {
        format!("{STAGE_SEGMENT_PREFIX}{}", self.number())
    }

    /// Apply a submission made on this stage.
    pub fn next(self, submit: Submit) -> Transition {
        match (self, submit) {
            (Stage::PageInfo, _) => Transition::Edit(Stage::Transcription),
            (Stage::Transcription, Submit::Save) => Transition::Edit(Stage::Transcription),
            (Stage::Transcription, _) => Transition::Edit(Stage::Review),
            (Stage::Review, Submit::Finalise) => Transition::Finished,
            (Stage::Review, Submit::Revisit(target)) => Transition::Edit(target),
            (Stage::Review, _) => Transition::Edit(Stage::Review),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segment())
    }
}

impl From<Stage> for i64 {
    fn from(stage: Stage) -> Self {
        stage.number()
    }
}

impl FromStr for Stage {
    type Err = CoreError;

    /// Parse a path segment such as `stage3`. Only the canonical spelling
    /// is accepted, so each stage has exactly one URL.
    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.segment() == segment)
            .ok_or_else(|| CoreError::not_found("Stage", segment))
    }
}
