#![forbid(unsafe_code)]

pub mod model;
pub mod parser;
pub mod quiz;
pub mod time;

pub use parser::{ParseError, ParseOutcome, ResponseParser, parse_response};
pub use quiz::{AnswerOutcome, QuizError, QuizSession, SessionState};
pub use time::Clock;
