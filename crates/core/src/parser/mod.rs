//! Turns raw generative-model output into validated question records.
//!
//! Two response shapes are accepted:
//!
//! - a JSON document, either `{"mcqs": [ ... ]}` (any array-valued key works,
//!   `mcqs` and `questions` are preferred) or a bare array of
//!   `{"question", "options", "answer"}` objects;
//! - the line-oriented format with `Question:`, `Options: ["a", "b"]` and
//!   `Answer:` lines.
//!
//! Invalid individual questions are dropped and counted; the rest of the
//! batch is kept. Parsing never panics and never returns a hard failure:
//! the worst case is an empty batch with [`ParseError::Malformed`].

mod fence;
mod json;
mod lines;

use thiserror::Error;

use crate::model::{QuestionDraft, QuestionRecord};

pub(crate) use fence::strip_code_fence;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Classification of a response that produced no usable questions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// Neither valid JSON of an accepted shape nor line-oriented output.
    #[error("response is not in a recognised question format")]
    Malformed,

    /// The structure was recognised but every question was invalid.
    #[error("response contained no valid questions ({skipped} skipped)")]
    NoValidQuestions { skipped: usize },
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Result of parsing one response: the surviving questions plus diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOutcome {
    pub questions: Vec<QuestionRecord>,
    /// Number of entries dropped because they were incomplete or invalid.
    pub skipped: usize,
    /// Set whenever `questions` is empty.
    pub error: Option<ParseError>,
}

impl ParseOutcome {
    fn malformed() -> Self {
        Self {
            questions: Vec::new(),
            skipped: 0,
            error: Some(ParseError::Malformed),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Collapse into a `Result`, failing when no questions survived.
    ///
    /// # Errors
    ///
    /// Returns the recorded `ParseError` when the batch is empty.
    pub fn into_result(self) -> Result<Vec<QuestionRecord>, ParseError> {
        match self.error {
            Some(err) => Err(err),
            None if self.questions.is_empty() => Err(ParseError::Malformed),
            None => Ok(self.questions),
        }
    }

    fn from_batch(batch: Batch) -> Self {
        let error = batch
            .questions
            .is_empty()
            .then_some(ParseError::NoValidQuestions {
                skipped: batch.skipped,
            });
        Self {
            questions: batch.questions,
            skipped: batch.skipped,
            error,
        }
    }
}

/// Questions accumulated by one of the shape-specific parsers.
#[derive(Debug, Default)]
pub(crate) struct Batch {
    questions: Vec<QuestionRecord>,
    skipped: usize,
}

impl Batch {
    fn push_draft(&mut self, position: usize, draft: QuestionDraft) {
        match draft.validate() {
            Ok(question) => self.questions.push(question),
            Err(err) => {
                log::debug!("skipping question #{position}: {err}");
                self.skipped += 1;
            }
        }
    }
}

//
// ─── PARSER ────────────────────────────────────────────────────────────────────
//

/// Stateless parser for generated question batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw model response.
    #[must_use]
    pub fn parse(&self, raw: &str) -> ParseOutcome {
        let text = strip_code_fence(raw);
        if text.is_empty() {
            return ParseOutcome::malformed();
        }

        // A well-formed JSON document decides the shape on its own.
        if let Ok(value) = serde_json::from_str(text) {
            return json::batch_from_value(value)
                .map_or_else(ParseOutcome::malformed, ParseOutcome::from_batch);
        }

        if let Some(batch) = lines::batch_from_lines(text) {
            return ParseOutcome::from_batch(batch);
        }

        match json::embedded_value(text).and_then(json::batch_from_value) {
            Some(batch) => ParseOutcome::from_batch(batch),
            None => {
                log::debug!("response matched no known question format");
                ParseOutcome::malformed()
            }
        }
    }
}

/// Shorthand for [`ResponseParser::parse`].
#[must_use]
pub fn parse_response(raw: &str) -> ParseOutcome {
    ResponseParser::new().parse(raw)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_question_example() {
        let raw = r#"{"mcqs":[{"question":"2+2?","options":["3","4","5","6"],"answer":"4"}]}"#;
        let outcome = parse_response(raw);
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.questions.len(), 1);
        let q = &outcome.questions[0];
        assert_eq!(q.prompt(), "2+2?");
        assert_eq!(q.options(), ["3", "4", "5", "6"]);
        assert_eq!(q.correct_option(), "4");
    }

    #[test]
    fn valid_batch_keeps_order_and_fields() {
        let raw = r#"{"mcqs":[
            {"question":"First","options":["a","b"],"answer":"a"},
            {"question":"Second ","options":["c"," d"],"answer":" d"},
            {"question":"Third","options":["e","f","g"],"answer":"g"}
        ]}"#;
        let outcome = parse_response(raw);
        let prompts: Vec<_> = outcome.questions.iter().map(QuestionRecord::prompt).collect();
        assert_eq!(prompts, ["First", "Second ", "Third"]);
        assert_eq!(outcome.questions[1].correct_option(), " d");
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn bad_answer_drops_only_that_question() {
        let raw = r#"{"mcqs":[
            {"question":"Keep","options":["a","b"],"answer":"a"},
            {"question":"Drop","options":["a","b"],"answer":"z"}
        ]}"#;
        let outcome = parse_response(raw);
        assert_eq!(outcome.questions.len(), 1);
        assert_eq!(outcome.questions[0].prompt(), "Keep");
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.error, None);
    }

    #[test]
    fn partial_success_skips_each_invalid_kind() {
        let raw = r#"{"mcqs":[
            {"question":"No answer","options":["a","b"]},
            {"question":"One option","options":["a"],"answer":"a"},
            {"question":"Good","options":["a","b"],"answer":"b"},
            {"question":"Wrong case","options":["Yes","No"],"answer":"yes"}
        ]}"#;
        let outcome = parse_response(raw);
        assert_eq!(outcome.questions.len(), 1);
        assert_eq!(outcome.questions[0].prompt(), "Good");
        assert_eq!(outcome.skipped, 3);
    }

    #[test]
    fn fenced_json_is_accepted() {
        let raw = "```json\n{\"mcqs\":[{\"question\":\"Q\",\"options\":[\"a\",\"b\"],\"answer\":\"b\"}]}\n```";
        assert_eq!(parse_response(raw).questions.len(), 1);
    }

    #[test]
    fn line_format_is_accepted() {
        let raw = "Question: Q?\nOptions: [\"yes\", \"no\"]\nAnswer: no\n";
        let outcome = parse_response(raw);
        assert_eq!(outcome.questions.len(), 1);
        assert_eq!(outcome.questions[0].correct_option(), "no");
    }

    #[test]
    fn json_inside_prose_is_recovered() {
        let raw = "Here are your questions:\n{\"mcqs\":[{\"question\":\"Q\",\"options\":[\"a\",\"b\"],\"answer\":\"a\"}]}\nGood luck!";
        assert_eq!(parse_response(raw).questions.len(), 1);
    }

    #[test]
    fn bare_array_inside_prose_is_recovered() {
        let raw = "Here are your questions:\n[{\"question\":\"Q\",\"options\":[\"a\",\"b\"],\"answer\":\"a\"}]\nGood luck!";
        let outcome = parse_response(raw);
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.questions.len(), 1);
        assert_eq!(outcome.questions[0].prompt(), "Q");
    }

    #[test]
    fn lone_question_object_is_a_batch_of_one() {
        let raw = r#"{"question":"2+2?","options":["3","4","5","6"],"answer":"4"}"#;
        let outcome = parse_response(raw);
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.questions.len(), 1);
        assert_eq!(outcome.questions[0].correct_option(), "4");
    }

    #[test]
    fn garbage_never_panics() {
        for raw in [
            "",
            "   ",
            "```",
            "``````",
            "not json at all",
            "{",
            "[1, 2, 3]",
            "null",
            "\"Question: hi\"",
            "{\"mcqs\": 5}",
            "{\"mcqs\": [null, 1, \"x\"]}",
            "Question:",
            "Answer:",
            "\u{0}\u{ffff}",
        ] {
            let outcome = parse_response(raw);
            assert!(outcome.questions.is_empty(), "unexpected questions for {raw:?}");
            assert!(outcome.error.is_some(), "missing error for {raw:?}");
        }
    }

    #[test]
    fn wrong_shape_json_is_malformed() {
        assert_eq!(parse_response("42").error, Some(ParseError::Malformed));
        assert_eq!(
            parse_response("{\"title\": \"quiz\"}").error,
            Some(ParseError::Malformed)
        );
        assert_eq!(parse_response("").error, Some(ParseError::Malformed));
    }

    #[test]
    fn recognised_but_empty_reports_skips() {
        let raw = r#"{"mcqs":[{"question":"Q","options":["a"],"answer":"a"}]}"#;
        assert_eq!(
            parse_response(raw).error,
            Some(ParseError::NoValidQuestions { skipped: 1 })
        );
    }

    #[test]
    fn into_result_maps_empty_to_error() {
        assert_eq!(parse_response("nope").into_result(), Err(ParseError::Malformed));
        let ok = parse_response(r#"[{"question":"Q","options":["a","b"],"answer":"a"}]"#)
            .into_result()
            .unwrap();
        assert_eq!(ok.len(), 1);
    }
}
