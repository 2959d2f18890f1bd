mod session;
mod state;

pub use session::QuizSession;
pub use state::{
    AnswerLogEntry, AnswerOutcome, QuizError, QuizProgress, SessionState, StateViolation,
};
