use std::path::Path;
use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;

use mcq_core::model::QuestionRecord;
use mcq_core::{Clock, QuizSession, ResponseParser};

use crate::error::{ExtractionError, QuizBuildError};
use crate::extraction::TextExtractor;
use crate::generation::ContentGenerator;
use crate::prompt::McqPrompt;

/// Turns a document into a ready-to-play quiz.
///
/// Pipeline: extract text, build the prompt, call the generator once, parse
/// the response, start a session. There is no retry; a caller that wants one
/// simply calls again.
#[derive(Clone)]
pub struct QuizBuilderService {
    clock: Clock,
    extractor: Arc<dyn TextExtractor>,
    generator: Arc<dyn ContentGenerator>,
    prompt: McqPrompt,
    parser: ResponseParser,
    shuffle: bool,
}

impl QuizBuilderService {
    #[must_use]
    pub fn new(
        clock: Clock,
        extractor: Arc<dyn TextExtractor>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            clock,
            extractor,
            generator,
            prompt: McqPrompt::default(),
            parser: ResponseParser::new(),
            shuffle: false,
        }
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: McqPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn prompt(&self) -> &McqPrompt {
        &self.prompt
    }

    /// Extract the text of the document at `path`.
    ///
    /// This blocks; async callers should run it on a blocking thread.
    ///
    /// # Errors
    ///
    /// Returns `QuizBuildError::Extraction` when nothing can be read.
    pub fn extract_text(&self, path: &Path) -> Result<String, QuizBuildError> {
        let text = self.extractor.extract(path)?;
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument.into());
        }
        Ok(text)
    }

    /// Ask the generator for questions about `text` and parse them.
    ///
    /// # Errors
    ///
    /// Returns `QuizBuildError::Generation` if the call fails and
    /// `QuizBuildError::NoQuestions` if the response holds no valid question.
    pub async fn questions_from_text(
        &self,
        text: &str,
    ) -> Result<Vec<QuestionRecord>, QuizBuildError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument.into());
        }

        let prompt = self.prompt.build(text);
        let response = self.generator.generate(&prompt).await?;
        let outcome = self.parser.parse(&response);
        if outcome.skipped > 0 {
            log::warn!(
                "dropped {} malformed questions from the response",
                outcome.skipped
            );
        }
        let questions = outcome.into_result()?;
        log::info!("parsed {} questions", questions.len());
        Ok(questions)
    }

    /// Generate questions for `text` and start a session over them.
    ///
    /// # Errors
    ///
    /// See [`Self::questions_from_text`]; also `QuizBuildError::Quiz` if the
    /// session cannot be started.
    pub async fn start_from_text(&self, text: &str) -> Result<QuizSession, QuizBuildError> {
        let mut questions = self.questions_from_text(text).await?;
        if self.shuffle {
            shuffle_questions(&mut questions);
        }
        Ok(QuizSession::new(questions, self.clock.now())?)
    }
}

fn shuffle_questions(questions: &mut [QuestionRecord]) {
    let mut rng = rng();
    questions.shuffle(&mut rng);
}
