//! Shared error types for the services crate.

use thiserror::Error;

use mcq_core::{ParseError, QuizError};

/// Errors emitted while turning a document into text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractionError {
    #[error("document contains no extractable text")]
    EmptyDocument,
    #[error("failed to read PDF: {0}")]
    Pdf(String),
    #[error("{0} is not installed")]
    ToolMissing(&'static str),
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: &'static str, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors emitted by content generators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("question generation is not configured")]
    Disabled,
    #[error("question generation returned an empty response")]
    EmptyResponse,
    #[error("question generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `QuizBuilderService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizBuildError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("no questions available: {0}")]
    NoQuestions(#[from] ParseError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

impl QuizBuildError {
    /// Single user-facing message for everything that leaves the user without a quiz.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoQuestions(_) | Self::Quiz(QuizError::EmptySession) => {
                "Could not generate a quiz from this document. Try another PDF.".into()
            }
            Self::Extraction(ExtractionError::EmptyDocument) => {
                "No text could be extracted from this document.".into()
            }
            Self::Generation(GenerationError::Disabled) => {
                "Question generation is not configured. Set MCQ_AI_API_KEY.".into()
            }
            other => other.to_string(),
        }
    }
}

/// Errors emitted when answering through `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("there is no option number {0}")]
    NoSuchOption(usize),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
