//! Form layer: field descriptors for rendering and binding of submissions.
//!
//! Every form is an ordered list of [`FormField`]s. The transcription form is
//! built at request time from the page's lines (one text/marginalia/not-found
//! triple per line), the others have a fixed shape.

use scriptorium_core::error::CoreError;
use scriptorium_core::line::validate_line_text;
use scriptorium_core::page::{validate_page_type, PAGE_TYPES};
use scriptorium_core::workflow::{Stage, Submit};
use scriptorium_db::models::line::{Line, LineCorrection};
use scriptorium_db::models::page::{Page, UpdatePageInfo};
use serde::{Deserialize, Serialize};

use crate::auth::csrf::CSRF_FIELD;

/// Values a browser may send for an unchecked box or unclicked button.
const FALSE_VALUES: &[&str] = &["", "false"];

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// A renderable form: where it posts and its fields in display order.
#[derive(Debug, Clone, Serialize)]
pub struct Form {
    pub action: String,
    pub method: &'static str,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text { value: String },
    TextArea { value: String },
    Password,
    Hidden { value: String },
    Checkbox { checked: bool },
    Select {
        choices: Vec<Choice>,
        selected: Option<String>,
    },
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

impl Form {
    fn post(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: "post",
            fields: Vec::new(),
        }
    }

    fn field(mut self, name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FormField {
            name: name.into(),
            label: label.into(),
            kind,
        });
        self
    }

    fn csrf(self, token: &str) -> Self {
        self.field(
            CSRF_FIELD,
            "",
            FieldKind::Hidden {
                value: token.to_string(),
            },
        )
    }

    #[cfg(test)]
    fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

/// A url-encoded form body as ordered `(name, value)` pairs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FormData(pub Vec<(String, String)>);

impl FormData {
    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// A checkbox is on, or a button was clicked, when its name is present
    /// with a value other than `""` or `"false"`.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|value| !FALSE_VALUES.contains(&value))
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

pub fn login_form(username: &str, next: &str) -> Form {
    Form::post("/login")
        .field(
            "username",
            "Username",
            FieldKind::Text {
                value: username.to_string(),
            },
        )
        .field("password", "Password", FieldKind::Password)
        .field(
            "next",
            "",
            FieldKind::Hidden {
                value: next.to_string(),
            },
        )
}

// ---------------------------------------------------------------------------
// Stage 1: page information
// ---------------------------------------------------------------------------

pub fn page_info_form(page: &Page, csrf_token: &str) -> Form {
    let choices = PAGE_TYPES
        .iter()
        .map(|&(value, label)| Choice { value, label })
        .collect();

    Form::post(stage_url(&page.id, Stage::PageInfo))
        .field(
            "page_type",
            "Page type",
            FieldKind::Select {
                choices,
                selected: page.page_type.clone(),
            },
        )
        .field(
            "handwriting",
            "This page contains mostly handwriting",
            FieldKind::Checkbox {
                checked: page.handwriting,
            },
        )
        .field(
            "bad_crop",
            "The cropped image doesn't show all the text on the page",
            FieldKind::Checkbox {
                checked: page.bad_crop,
            },
        )
        .field(
            "page_issue",
            "This page has other image issues (please describe)",
            FieldKind::Checkbox {
                checked: page.page_issue,
            },
        )
        .field(
            "issue_description",
            "Issues with this page",
            FieldKind::TextArea {
                value: page.issue_description.clone().unwrap_or_default(),
            },
        )
        .field("submit", "Submit", FieldKind::Submit)
        .csrf(csrf_token)
}

pub fn bind_page_info(data: &FormData) -> Result<UpdatePageInfo, CoreError> {
    let issue_description = data
        .get("issue_description")
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    Ok(UpdatePageInfo {
        page_type: validate_page_type(data.get("page_type"))?,
        handwriting: data.is_set("handwriting"),
        bad_crop: data.is_set("bad_crop"),
        page_issue: data.is_set("page_issue"),
        issue_description,
    })
}

// ---------------------------------------------------------------------------
// Stage 2: per-line transcription
// ---------------------------------------------------------------------------

pub fn line_text_field(position: i64) -> String {
    format!("line-{position}")
}

pub fn line_marginalia_field(position: i64) -> String {
    format!("line-{position}-m")
}

pub fn line_not_found_field(position: i64) -> String {
    format!("line-{position}-n")
}

/// One field triple per line, keyed by position, then the two actions.
pub fn transcription_form(page_id: &str, lines: &[Line], csrf_token: &str) -> Form {
    let form = lines
        .iter()
        .fold(Form::post(stage_url(page_id, Stage::Transcription)), |form, line| {
            form.field(
                line_text_field(line.position),
                line.ocr.clone(),
                FieldKind::Text {
                    value: line.corrected.clone(),
                },
            )
            .field(
                line_marginalia_field(line.position),
                "Marginalia",
                FieldKind::Checkbox {
                    checked: line.is_marginalia,
                },
            )
            .field(
                line_not_found_field(line.position),
                "Line not found",
                FieldKind::Checkbox {
                    checked: line.not_found,
                },
            )
        });

    form.field("save", "Save and continue", FieldKind::Submit)
        .field("finalise", "Finalise", FieldKind::Submit)
        .csrf(csrf_token)
}

/// Read every line's triple back from the submission.
///
/// A missing text field keeps the stored correction; missing checkboxes are
/// off. Any line that fails validation rejects the whole submission.
pub fn bind_transcription(
    lines: &[Line],
    data: &FormData,
) -> Result<(Vec<LineCorrection>, Submit), CoreError> {
    let corrections = lines
        .iter()
        .map(|line| {
            let corrected = data
                .get(&line_text_field(line.position))
                .unwrap_or(&line.corrected)
                .to_string();
            validate_line_text(line.position, &corrected)?;

            Ok::<_, CoreError>(LineCorrection {
                position: line.position,
                corrected,
                is_marginalia: data.is_set(&line_marginalia_field(line.position)),
                not_found: data.is_set(&line_not_found_field(line.position)),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let submit = if data.is_set("save") {
        Submit::Save
    } else if data.is_set("finalise") {
        Submit::Finalise
    } else {
        Submit::Default
    };

    Ok((corrections, submit))
}

// ---------------------------------------------------------------------------
// Stage 3: review
// ---------------------------------------------------------------------------

pub fn review_form(page_id: &str, csrf_token: &str) -> Form {
    Form::post(stage_url(page_id, Stage::Review))
        .field("finalise", "Complete submission", FieldKind::Submit)
        .field(
            "stage1",
            "Fix an error with the page information",
            FieldKind::Submit,
        )
        .field(
            "stage2",
            "Fix an error with the OCR transcription",
            FieldKind::Submit,
        )
        .csrf(csrf_token)
}

/// Which review button was clicked; `finalise` wins over the back buttons.
pub fn review_submit(data: &FormData) -> Submit {
    if data.is_set("finalise") {
        Submit::Finalise
    } else if data.is_set("stage1") {
        Submit::Revisit(Stage::PageInfo)
    } else if data.is_set("stage2") {
        Submit::Revisit(Stage::Transcription)
    } else {
        Submit::Default
    }
}

/// Path of a stage's edit view.
pub fn stage_url(page_id: &str, stage: Stage) -> String {
    format!("/edit/{}/{}", urlencoding::encode(page_id), stage.segment())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn line(position: i64, ocr: &str) -> Line {
        Line {
            id: position + 1,
            page_id: "p1".to_string(),
            position,
            ocr: ocr.to_string(),
            corrected: ocr.to_string(),
            is_marginalia: false,
            not_found: false,
        }
    }

    fn data(pairs: &[(&str, &str)]) -> FormData {
        FormData(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn checkbox_rules() {
        let form = data(&[("a", "y"), ("b", ""), ("c", "false"), ("d", "on")]);
        assert!(form.is_set("a"));
        assert!(!form.is_set("b"));
        assert!(!form.is_set("c"));
        assert!(form.is_set("d"));
        assert!(!form.is_set("missing"));
    }

    #[test]
    fn transcription_form_has_a_triple_per_line_in_order() {
        let lines = vec![line(0, "Helo"), line(1, "Wrld")];
        let form = transcription_form("p1", &lines, "tok");

        let names: Vec<&str> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "line-0", "line-0-m", "line-0-n", "line-1", "line-1-m", "line-1-n", "save",
                "finalise", "csrf_token"
            ]
        );
        assert_eq!(form.action, "/edit/p1/stage2");

        let first = form.get("line-0").unwrap();
        assert_eq!(first.label, "Helo");
        assert_eq!(
            first.kind,
            FieldKind::Text {
                value: "Helo".to_string()
            }
        );
    }

    #[test]
    fn transcription_form_for_page_without_lines_has_only_actions() {
        let form = transcription_form("p1", &[], "tok");
        assert_eq!(form.fields.len(), 3);
    }

    #[test]
    fn bind_transcription_reads_text_and_flags() {
        let lines = vec![line(0, "Helo"), line(1, "Wrld")];
        let submitted = data(&[
            ("line-0", "Hello"),
            ("line-1", "World"),
            ("line-1-m", "y"),
            ("finalise", "Finalise"),
        ]);

        let (corrections, submit) = bind_transcription(&lines, &submitted).unwrap();

        assert_eq!(submit, Submit::Finalise);
        assert_eq!(corrections[0].corrected, "Hello");
        assert_eq!(corrections[1].corrected, "World");
        assert!(!corrections[0].is_marginalia);
        assert!(corrections[1].is_marginalia);
        assert!(!corrections[1].not_found);
    }

    #[test]
    fn bind_transcription_keeps_text_when_field_missing() {
        let mut stored = line(0, "Helo");
        stored.corrected = "Hello".to_string();
        stored.is_marginalia = true;

        let (corrections, submit) = bind_transcription(&[stored], &data(&[])).unwrap();

        assert_eq!(corrections[0].corrected, "Hello");
        assert!(!corrections[0].is_marginalia, "missing checkbox means unchecked");
        assert_eq!(submit, Submit::Default);
    }

    #[test]
    fn bind_transcription_save_wins() {
        let submitted = data(&[("save", "Save and continue"), ("finalise", "Finalise")]);
        let (_, submit) = bind_transcription(&[line(0, "a")], &submitted).unwrap();
        assert_eq!(submit, Submit::Save);
    }

    #[test]
    fn bind_transcription_rejects_overlong_line() {
        let long = "x".repeat(300);
        let submitted = data(&[("line-0", long.as_str())]);
        assert_matches!(
            bind_transcription(&[line(0, "a")], &submitted),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn bind_page_info_reads_fields() {
        let submitted = data(&[
            ("page_type", "judgement"),
            ("handwriting", "y"),
            ("issue_description", "  faded ink  "),
            ("submit", "Submit"),
        ]);

        let info = bind_page_info(&submitted).unwrap();

        assert_eq!(info.page_type.as_deref(), Some("judgement"));
        assert!(info.handwriting);
        assert!(!info.bad_crop);
        assert!(!info.page_issue);
        assert_eq!(info.issue_description.as_deref(), Some("faded ink"));
    }

    #[test]
    fn bind_page_info_rejects_unknown_type() {
        let submitted = data(&[("page_type", "letter")]);
        assert_matches!(bind_page_info(&submitted), Err(CoreError::Validation(_)));
    }

    #[test]
    fn review_buttons() {
        assert_eq!(review_submit(&data(&[("finalise", "x")])), Submit::Finalise);
        assert_eq!(
            review_submit(&data(&[("stage1", "x")])),
            Submit::Revisit(Stage::PageInfo)
        );
        assert_eq!(
            review_submit(&data(&[("stage2", "x")])),
            Submit::Revisit(Stage::Transcription)
        );
        assert_eq!(
            review_submit(&data(&[("finalise", "x"), ("stage1", "x")])),
            Submit::Finalise
        );
        assert_eq!(review_submit(&data(&[])), Submit::Default);
    }

    #[test]
    fn page_info_form_selects_current_type() {
        let page = Page {
            id: "p1".to_string(),
            shelfmark: "S".to_string(),
            document: "1".to_string(),
            sequence: "2".to_string(),
            page_type: Some("index".to_string()),
            handwriting: true,
            bad_crop: false,
            page_issue: false,
            issue_description: None,
            is_finished: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let form = page_info_form(&page, "tok");

        assert_matches!(
            &form.get("page_type").unwrap().kind,
            FieldKind::Select { choices, selected } if choices.len() == 7 && selected.as_deref() == Some("index")
        );
        assert_eq!(
            form.get("handwriting").unwrap().kind,
            FieldKind::Checkbox { checked: true }
        );
        assert_eq!(
            form.get("csrf_token").unwrap().kind,
            FieldKind::Hidden {
                value: "tok".to_string()
            }
        );
    }

    #[test]
    fn stage_urls_escape_page_ids() {
        assert_eq!(stage_url("p 1", Stage::Review), "/edit/p%201/stage3");
    }
}
