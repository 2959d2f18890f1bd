#![forbid(unsafe_code)]

pub mod error;
pub mod extraction;
pub mod generation;
pub mod prompt;
pub mod quiz_builder;
pub mod quiz_loop;

pub use mcq_core::Clock;

pub use error::{AnswerError, ExtractionError, GenerationError, QuizBuildError};
pub use extraction::{
    FallbackExtractor, OcrConfig, OcrExtractor, PdfTextExtractor, PlainTextExtractor,
    TextExtractor,
};
pub use generation::{ChatCompletionsGenerator, ContentGenerator, GeneratorConfig};
pub use prompt::{McqPrompt, ResponseFormat};
pub use quiz_builder::QuizBuilderService;
pub use quiz_loop::{QuizAnswerResult, QuizLoopService};
