use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Why a session operation was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateViolation {
    #[error("the quiz is already complete")]
    Completed,

    #[error("the current question was already answered")]
    AlreadyAnswered,

    #[error("the current question has not been answered yet")]
    NotAnswered,
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("cannot start a quiz without questions")]
    EmptySession,

    #[error("invalid quiz state: {0}")]
    InvalidState(StateViolation),
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Feedback for a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Question `index` is shown and waiting for an answer.
    Active { index: usize },
    /// Question `index` was answered; the session has not advanced yet.
    Answered { index: usize, correct: bool },
    /// Every question has been answered.
    Complete { score: usize, total: usize },
}

impl SessionState {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// Index of the question this state refers to, if any.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match *self {
            Self::Active { index } | Self::Answered { index, .. } => Some(index),
            Self::Complete { .. } => None,
        }
    }
}

/// Aggregated view of quiz progress, useful for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

/// One entry of the append-only answer log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerLogEntry {
    pub index: usize,
    pub selected: String,
    pub correct: bool,
}
