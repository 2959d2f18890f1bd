mod question;
mod summary;

pub use question::{QuestionDraft, QuestionError, QuestionRecord};
pub use summary::QuizSummary;
