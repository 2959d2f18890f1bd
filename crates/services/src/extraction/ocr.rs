use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ExtractionError;

use super::TextExtractor;

const PDFTOPPM: &str = "pdftoppm";
const TESSERACT: &str = "tesseract";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OcrConfig {
    pub dpi: u32,
    pub lang: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            lang: "eng".into(),
        }
    }
}

impl OcrConfig {
    /// Read `MCQ_OCR_DPI` and `MCQ_OCR_LANG`, keeping defaults for unset or invalid values.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let dpi = env::var("MCQ_OCR_DPI")
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .filter(|dpi| *dpi > 0)
            .unwrap_or(defaults.dpi);
        let lang = env::var("MCQ_OCR_LANG")
            .ok()
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or(defaults.lang);
        Self { dpi, lang }
    }
}

/// Rasterises each PDF page with `pdftoppm` and reads it back with `tesseract`.
#[derive(Clone, Debug, Default)]
pub struct OcrExtractor {
    config: OcrConfig,
}

impl OcrExtractor {
    #[must_use]
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    fn render_pages(&self, path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
        let output = Command::new(PDFTOPPM)
            .arg("-png")
            .arg("-r")
            .arg(self.config.dpi.to_string())
            .arg(path)
            .arg(out_dir.join("page"))
            .output()
            .map_err(|err| spawn_error(PDFTOPPM, err))?;

        if !output.status.success() {
            return Err(ExtractionError::ToolFailed {
                tool: PDFTOPPM,
                message: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let mut pages: Vec<PathBuf> = fs::read_dir(out_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        // pdftoppm zero-pads page numbers, so lexical order is page order.
        pages.sort();
        Ok(pages)
    }

    fn read_page(&self, image: &Path) -> Result<String, ExtractionError> {
        let output = Command::new(TESSERACT)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.lang)
            .output()
            .map_err(|err| spawn_error(TESSERACT, err))?;

        if !output.status.success() {
            log::warn!(
                "tesseract reported an error on {}: {}",
                image.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// A missing binary is `ToolMissing`; any other launch failure stays an I/O error.
fn spawn_error(tool: &'static str, err: io::Error) -> ExtractionError {
    if err.kind() == io::ErrorKind::NotFound {
        ExtractionError::ToolMissing(tool)
    } else {
        ExtractionError::Io(err)
    }
}

impl TextExtractor for OcrExtractor {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let scratch = tempfile::tempdir()?;
        let pages = self.render_pages(path, scratch.path())?;
        log::info!(
            "running OCR on {} pages (dpi={}, lang={})",
            pages.len(),
            self.config.dpi,
            self.config.lang
        );

        let mut text = String::new();
        for page in &pages {
            text.push_str(&self.read_page(page)?);
            text.push('\n');
        }
        Ok(text.trim().to_owned())
    }
}
