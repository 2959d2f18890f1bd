use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a question draft is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("answer is not one of the options")]
    AnswerNotInOptions,
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it appears in generated output.
///
/// Field names follow the JSON shape requested from the model
/// (`question`, `options`, `answer`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuestionDraft {
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options,
            answer: answer.into(),
        }
    }

    /// Validate the draft into an immutable [`QuestionRecord`].
    ///
    /// All fields are kept verbatim since answers are compared by exact
    /// string equality.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, fewer than two options
    /// are given, or the answer is not present in the options.
    pub fn validate(self) -> Result<QuestionRecord, QuestionError> {
        if self.question.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                len: self.options.len(),
            });
        }
        if !self.options.iter().any(|option| *option == self.answer) {
            return Err(QuestionError::AnswerNotInOptions);
        }

        Ok(QuestionRecord {
            prompt: self.question,
            options: self.options,
            correct_option: self.answer,
        })
    }
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
///
/// Only obtainable through [`QuestionRecord::new`] or [`QuestionDraft::validate`],
/// so `correct_option` is always one of `options` and there are at least two options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDraft")]
pub struct QuestionRecord {
    #[serde(rename = "question")]
    prompt: String,
    options: Vec<String>,
    #[serde(rename = "answer")]
    correct_option: String,
}

impl QuestionRecord {
    /// Build a record from its parts.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the record would break its invariants.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        QuestionDraft::new(prompt, options, correct_option).validate()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    /// Exact, case-sensitive comparison against the correct option.
    ///
    /// Duplicate options equal to the correct one all count as correct.
    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        self.correct_option == selected
    }

    /// Option text for a 1-based option number, as shown to users.
    #[must_use]
    pub fn option_by_number(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.options.get(idx))
            .map(String::as_str)
    }
}

impl TryFrom<QuestionDraft> for QuestionRecord {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn valid_record_keeps_fields_verbatim() {
        let record = QuestionRecord::new("2+2?", opts(&["3", "4", " 5"]), "4").unwrap();
        assert_eq!(record.prompt(), "2+2?");
        assert_eq!(record.options(), &opts(&["3", "4", " 5"])[..]);
        assert_eq!(record.correct_option(), "4");
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let err = QuestionRecord::new("   ", opts(&["a", "b"]), "a").unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn single_option_is_rejected() {
        let err = QuestionRecord::new("Q", opts(&["a"]), "a").unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { len: 1 });
    }

    #[test]
    fn answer_must_match_an_option_exactly() {
        let err = QuestionRecord::new("Q", opts(&["Paris", "Rome"]), "paris").unwrap_err();
        assert_eq!(err, QuestionError::AnswerNotInOptions);
    }

    #[test]
    fn duplicate_correct_options_are_allowed() {
        let record = QuestionRecord::new("Q", opts(&["a", "a", "b"]), "a").unwrap();
        assert!(record.is_correct("a"));
        assert!(!record.is_correct("A"));
        assert!(!record.is_correct("a "));
    }

    #[test]
    fn option_numbers_are_one_based() {
        let record = QuestionRecord::new("Q", opts(&["x", "y"]), "y").unwrap();
        assert_eq!(record.option_by_number(1), Some("x"));
        assert_eq!(record.option_by_number(2), Some("y"));
        assert_eq!(record.option_by_number(0), None);
        assert_eq!(record.option_by_number(3), None);
    }

    #[test]
    fn deserialize_runs_validation() {
        let ok: QuestionRecord =
            serde_json::from_str(r#"{"question":"Q","options":["a","b"],"answer":"b"}"#)
                .unwrap();
        assert_eq!(ok.correct_option(), "b");

        let bad = serde_json::from_str::<QuestionRecord>(
            r#"{"question":"Q","options":["a","b"],"answer":"c"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn serializes_with_wire_names() {
        let record = QuestionRecord::new("Q", opts(&["a", "b"]), "a").unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["question"], "Q");
        assert_eq!(json["answer"], "a");
        assert_eq!(json["options"][1], "b");
    }
}
