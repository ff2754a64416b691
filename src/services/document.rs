use std::path::Path;

use crate::errors::AssistantError;

/// Flat text extraction from a local PDF. Layout is not preserved; the
/// summarization path only needs the concatenated text.
pub fn extract_text(path: &Path) -> Result<String, AssistantError> {
    pdf_extract::extract_text(path).map_err(|e| AssistantError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_document_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        assert!(matches!(
            extract_text(&path),
            Err(AssistantError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_document_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.pdf");

        assert!(matches!(
            extract_text(&path),
            Err(AssistantError::Parse(_))
        ));
    }
}
