//! Rules for recognised text lines.

use crate::error::CoreError;

/// Maximum length (in characters) of OCR and corrected line text.
pub const MAX_LINE_LENGTH: usize = 256;

/// A line has changes when its corrected text differs from the OCR text.
pub fn has_changes(ocr: &str, corrected: &str) -> bool {
    ocr != corrected
}

/// Validate corrected text submitted for the line at `position`.
pub fn validate_line_text(position: i64, text: &str) -> Result<(), CoreError> {
    let length = text.chars().count();
    if length > MAX_LINE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Line {position} is {length} characters long; the maximum is {MAX_LINE_LENGTH}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_line_has_no_changes() {
        assert!(!has_changes("Helo", "Helo"));
    }

    #[test]
    fn corrected_line_has_changes() {
        assert!(has_changes("Helo", "Hello"));
        assert!(has_changes("Helo", ""));
    }

    #[test]
    fn whitespace_counts_as_a_change() {
        assert!(has_changes("Helo", "Helo "));
    }

    #[test]
    fn line_length_limit_counts_characters() {
        let at_limit = "ä".repeat(MAX_LINE_LENGTH);
        assert!(validate_line_text(0, &at_limit).is_ok());

        let over = "a".repeat(MAX_LINE_LENGTH + 1);
        let err = validate_line_text(4, &over).unwrap_err();
        assert!(err.to_string().contains("Line 4"));
    }
}
