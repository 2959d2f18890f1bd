//! Document-to-text adapters.
//!
//! Every extractor is synchronous and may block for a long time (OCR in
//! particular), so async callers should run them on a blocking thread.

mod ocr;
mod pdf;

use std::fs;
use std::path::Path;

use crate::error::ExtractionError;

pub use ocr::{OcrConfig, OcrExtractor};
pub use pdf::PdfTextExtractor;

/// Something that can pull plain text out of a document on disk.
pub trait TextExtractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extract the document's text. An empty string means the document has
    /// no text this extractor can see.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError` when the document cannot be read.
    fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Reads UTF-8 text files as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        Ok(fs::read_to_string(path)?.trim().to_owned())
    }
}

/// Tries `primary` first and switches to `fallback` when it yields no text.
///
/// The usual pairing is the PDF text layer followed by OCR for scanned pages.
pub struct FallbackExtractor<P, F> {
    primary: P,
    fallback: F,
}

impl<P: TextExtractor, F: TextExtractor> FallbackExtractor<P, F> {
    #[must_use]
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl FallbackExtractor<PdfTextExtractor, OcrExtractor> {
    /// PDF text layer with OCR fallback configured from the environment.
    #[must_use]
    pub fn pdf_with_ocr() -> Self {
        Self::new(PdfTextExtractor, OcrExtractor::new(OcrConfig::from_env()))
    }
}

impl<P: TextExtractor, F: TextExtractor> TextExtractor for FallbackExtractor<P, F> {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        match self.primary.extract(path) {
            Ok(text) if !text.trim().is_empty() => {
                log::info!("extracted {} chars with {}", text.len(), self.primary.name());
                return Ok(text);
            }
            Ok(_) => log::warn!(
                "{} found no text, falling back to {}",
                self.primary.name(),
                self.fallback.name()
            ),
            Err(err) => log::warn!(
                "{} failed ({err}), falling back to {}",
                self.primary.name(),
                self.fallback.name()
            ),
        }

        let text = self.fallback.extract(path)?;
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }
        log::info!("extracted {} chars with {}", text.len(), self.fallback.name());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        text: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(text: Option<&'static str>) -> Self {
            Self {
                text,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl TextExtractor for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn extract(&self, _path: &Path) -> Result<String, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.text
                .map(str::to_owned)
                .ok_or(ExtractionError::ToolMissing("fixed"))
        }
    }

    #[test]
    fn primary_text_wins() {
        let extractor = FallbackExtractor::new(Fixed::new(Some("layer")), Fixed::new(Some("ocr")));
        let text = extractor.extract(Path::new("doc.pdf")).unwrap();
        assert_eq!(text, "layer");
        assert_eq!(extractor.fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn blank_primary_falls_back() {
        let extractor = FallbackExtractor::new(Fixed::new(Some("  \n")), Fixed::new(Some("ocr")));
        assert_eq!(extractor.extract(Path::new("doc.pdf")).unwrap(), "ocr");
    }

    #[test]
    fn failing_primary_falls_back() {
        let extractor = FallbackExtractor::new(Fixed::new(None), Fixed::new(Some("ocr")));
        assert_eq!(extractor.extract(Path::new("doc.pdf")).unwrap(), "ocr");
    }

    #[test]
    fn both_blank_is_empty_document() {
        let extractor = FallbackExtractor::new(Fixed::new(Some("")), Fixed::new(Some(" ")));
        let err = extractor.extract(Path::new("doc.pdf")).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyDocument));
    }

    #[test]
    fn plain_text_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  Photosynthesis converts light.  ").unwrap();
        let text = PlainTextExtractor.extract(file.path()).unwrap();
        assert_eq!(text, "Photosynthesis converts light.");
    }

    #[test]
    fn plain_text_missing_file_is_io_error() {
        let err = PlainTextExtractor
            .extract(Path::new("/definitely/not/here.txt"))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Io(_)));
    }
}
