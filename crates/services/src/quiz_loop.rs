use mcq_core::quiz::StateViolation;
use mcq_core::{AnswerOutcome, Clock, QuizError, QuizSession, SessionState};

use crate::error::AnswerError;

/// Result of answering the current question and moving on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswerResult {
    pub outcome: AnswerOutcome,
    /// State after advancing past the answered question.
    pub state: SessionState,
}

impl QuizAnswerResult {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

/// Drives a session for clients that show feedback and move on in one step.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizLoopService {
    clock: Clock,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    /// Submit `selected` for the current question, then advance.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` if the session is already complete or
    /// the current question was answered without advancing.
    pub fn answer_current(
        &self,
        session: &mut QuizSession,
        selected: &str,
    ) -> Result<QuizAnswerResult, QuizError> {
        let outcome = session.submit_answer(selected)?;
        let state = session.advance(self.clock.now())?;
        Ok(QuizAnswerResult { outcome, state })
    }

    /// Answer with the 1-based option `number` of the current question.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::NoSuchOption` if the number is out of range, or
    /// `AnswerError::Quiz` for state errors.
    pub fn answer_by_number(
        &self,
        session: &mut QuizSession,
        number: usize,
    ) -> Result<QuizAnswerResult, AnswerError> {
        let Some(question) = session.current_question() else {
            return Err(QuizError::InvalidState(StateViolation::Completed).into());
        };
        let selected = question
            .option_by_number(number)
            .ok_or(AnswerError::NoSuchOption(number))?
            .to_owned();
        Ok(self.answer_current(session, &selected)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcq_core::model::QuestionRecord;
    use mcq_core::time::fixed_now;

    fn session() -> QuizSession {
        let questions = vec![
            QuestionRecord::new("Q1", vec!["a".into(), "b".into()], "b").unwrap(),
            QuestionRecord::new("Q2", vec!["c".into(), "d".into()], "c").unwrap(),
        ];
        QuizSession::new(questions, fixed_now()).unwrap()
    }

    #[test]
    fn answer_current_advances() {
        let svc = QuizLoopService::new(Clock::fixed(fixed_now()));
        let mut session = session();

        let first = svc.answer_current(&mut session, "b").unwrap();
        assert!(first.outcome.correct);
        assert_eq!(first.state, SessionState::Active { index: 1 });
        assert!(!first.is_complete());

        let second = svc.answer_current(&mut session, "d").unwrap();
        assert!(!second.outcome.correct);
        assert_eq!(second.outcome.correct_answer, "c");
        assert!(second.is_complete());
        assert_eq!(session.final_score(), (1, 2));
        assert_eq!(session.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn answer_by_number_maps_to_option_text() {
        let svc = QuizLoopService::new(Clock::fixed(fixed_now()));
        let mut session = session();
        let result = svc.answer_by_number(&mut session, 2).unwrap();
        assert!(result.outcome.correct);
        assert_eq!(session.answer_log()[0].selected, "b");
    }

    #[test]
    fn out_of_range_number_is_rejected_without_answering() {
        let svc = QuizLoopService::default();
        let mut session = session();
        let err = svc.answer_by_number(&mut session, 3).unwrap_err();
        assert!(matches!(err, AnswerError::NoSuchOption(3)));
        assert!(session.answer_log().is_empty());
    }

    #[test]
    fn completed_session_is_rejected() {
        let svc = QuizLoopService::default();
        let mut session = session();
        svc.answer_current(&mut session, "a").unwrap();
        svc.answer_current(&mut session, "c").unwrap();

        let err = svc.answer_current(&mut session, "c").unwrap_err();
        assert_eq!(err, QuizError::InvalidState(StateViolation::Completed));
        let err = svc.answer_by_number(&mut session, 1).unwrap_err();
        assert!(matches!(
            err,
            AnswerError::Quiz(QuizError::InvalidState(StateViolation::Completed))
        ));
    }
}
