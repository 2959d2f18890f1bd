use std::fmt;

use chrono::{DateTime, Utc};

use crate::model::{QuestionRecord, QuizSummary};

use super::state::{
    AnswerLogEntry, AnswerOutcome, QuizError, QuizProgress, SessionState, StateViolation,
};

/// Walk through a fixed batch of questions, one at a time.
///
/// Answering and moving on are separate steps so a client can show feedback
/// for the current question before the next one appears. Each question takes
/// exactly one answer: a second `submit_answer` on the same question is
/// refused, which keeps the answer log append-only and the score from ever
/// counting a question twice.
pub struct QuizSession {
    questions: Vec<QuestionRecord>,
    current: usize,
    score: usize,
    answers: Vec<AnswerLogEntry>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over `questions`.
    ///
    /// `started_at` should come from the caller's clock to keep time deterministic.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptySession` if no questions are provided.
    pub fn new(
        questions: Vec<QuestionRecord>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptySession);
        }

        Ok(Self {
            questions,
            current: 0,
            score: 0,
            answers: Vec::new(),
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Answers in the order they were given.
    #[must_use]
    pub fn answer_log(&self) -> &[AnswerLogEntry] {
        &self.answers
    }

    /// The answer recorded for question `index`, if any.
    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<&AnswerLogEntry> {
        self.answers.iter().find(|entry| entry.index == index)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.questions.len()
    }

    fn current_answer(&self) -> Option<&AnswerLogEntry> {
        self.answers
            .last()
            .filter(|entry| entry.index == self.current)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.is_complete() {
            let (score, total) = self.final_score();
            return SessionState::Complete { score, total };
        }
        match self.current_answer() {
            Some(entry) => SessionState::Answered {
                index: self.current,
                correct: entry.correct,
            },
            None => SessionState::Active {
                index: self.current,
            },
        }
    }

    /// Record an answer for the current question without advancing.
    ///
    /// The comparison is exact: no trimming and no case folding.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` if the session is complete or the
    /// current question already has an answer.
    pub fn submit_answer(&mut self, selected: &str) -> Result<AnswerOutcome, QuizError> {
        let Some(question) = self.questions.get(self.current) else {
            return Err(QuizError::InvalidState(StateViolation::Completed));
        };
        if self.current_answer().is_some() {
            return Err(QuizError::InvalidState(StateViolation::AlreadyAnswered));
        }

        let correct = question.is_correct(selected);
        let correct_answer = question.correct_option().to_owned();
        if correct {
            self.score += 1;
        }
        self.answers.push(AnswerLogEntry {
            index: self.current,
            selected: selected.to_owned(),
            correct,
        });
        log::debug!(
            "question {} answered ({})",
            self.current + 1,
            if correct { "correct" } else { "wrong" }
        );

        Ok(AnswerOutcome {
            correct,
            correct_answer,
        })
    }

    /// Move past an answered question.
    ///
    /// `at` is recorded as the completion time when this was the last question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` if the session is complete or the
    /// current question has not been answered.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<SessionState, QuizError> {
        if self.is_complete() {
            return Err(QuizError::InvalidState(StateViolation::Completed));
        }
        if self.current_answer().is_none() {
            return Err(QuizError::InvalidState(StateViolation::NotAnswered));
        }

        self.current += 1;
        if self.is_complete() {
            self.completed_at = Some(at);
        }
        Ok(self.state())
    }

    /// `(score, total)`; valid in any state.
    #[must_use]
    pub fn final_score(&self) -> (usize, usize) {
        (self.score, self.questions.len())
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.questions.len(),
            answered: self.answers.len(),
            remaining: self.questions.len().saturating_sub(self.answers.len()),
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            score: self.score,
            total: self.questions.len(),
            answered: self.answers.len(),
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("answers_len", &self.answers.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
