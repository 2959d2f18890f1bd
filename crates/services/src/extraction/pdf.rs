use std::fs;
use std::path::Path;

use crate::error::ExtractionError;

use super::TextExtractor;

/// Reads the embedded text layer of a PDF with `pdf-extract`.
///
/// Scanned documents have no text layer and come back as an empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn name(&self) -> &'static str {
        "pdf-text"
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = fs::read(path)?;
        let text = pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|err| ExtractionError::Pdf(err.to_string()))?;
        Ok(text.trim().to_owned())
    }
}

