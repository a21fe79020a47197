//! Page classification choices and validation.

use crate::error::CoreError;

/// Maximum length of a page identifier.
pub const MAX_PAGE_ID_LENGTH: usize = 16;

/// Page type choices as `(value, label)` pairs, in display order.
pub const PAGE_TYPES: &[(&str, &str)] = &[
    ("body", "Document body text"),
    ("index", "Index page"),
    ("petition", "Petition"),
    ("answers", "Answers to a Petition"),
    ("judgement", "Judgement on a Petition"),
    ("multiple", "Multiple documents on page"),
    ("unknown", "Other / Unknown"),
];

/// Normalise a submitted page type.
///
/// An absent or empty value clears the classification; anything else must be
/// one of [`PAGE_TYPES`].
pub fn validate_page_type(value: Option<&str>) -> Result<Option<String>, CoreError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if PAGE_TYPES.iter().any(|(choice, _)| *choice == v) => Ok(Some(v.to_string())),
        Some(v) => Err(CoreError::Validation(format!(
            "Invalid page type '{v}'. Must be one of: {}",
            PAGE_TYPES
                .iter()
                .map(|(choice, _)| *choice)
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Validate an imported page identifier.
pub fn validate_page_id(id: &str) -> Result<(), CoreError> {
    if id.trim().is_empty() {
        return Err(CoreError::Validation("Page id must not be empty".into()));
    }
    if id.len() > MAX_PAGE_ID_LENGTH {
        return Err(CoreError::Validation(format!(
            "Page id '{id}' exceeds {MAX_PAGE_ID_LENGTH} characters"
        )));
    }
    if id.contains('/') {
        return Err(CoreError::Validation(format!(
            "Page id '{id}' must not contain '/'"
        )));
    }
    Ok(())
}

/// Image directory of a scan relative to the image root.
pub fn dirpath(shelfmark: &str, document: &str, sequence: &str) -> String {
    format!("{shelfmark}/{document}/{sequence}")
}
