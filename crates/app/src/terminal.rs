use std::io::{self, BufRead, Write};

use mcq_core::QuizSession;
use mcq_core::model::{QuestionRecord, QuizSummary};
use services::{AnswerError, QuizAnswerResult, QuizLoopService};

/// Play `session` to the end over line-based input and output.
///
/// Input may be an option number or the exact option text; a number in range
/// always selects by position. Stops early on
/// end of input; the returned summary then reports fewer answered questions.
pub fn play(
    session: &mut QuizSession,
    quiz_loop: &QuizLoopService,
    mut input: impl BufRead,
    mut out: impl Write,
) -> io::Result<QuizSummary> {
    let total = session.questions().len();

    while let Some(question) = session.current_question() {
        let number = session.current_index() + 1;
        render_question(&mut out, number, total, question)?;
        let options = question.options().to_vec();

        let Some(result) = read_answer(session, quiz_loop, &mut input, &mut out)? else {
            writeln!(out)?;
            break;
        };
        render_feedback(&mut out, &options, &result)?;
    }

    let summary = session.summary();
    if summary.completed_at.is_some() {
        writeln!(
            out,
            "Game over! Your score: {}/{} ({}%)",
            summary.score,
            summary.total,
            summary.percentage()
        )?;
    } else {
        writeln!(
            out,
            "Quiz stopped after {} of {} questions. Score: {}",
            summary.answered, summary.total, summary.score
        )?;
    }
    out.flush()?;
    Ok(summary)
}

fn render_question(
    out: &mut impl Write,
    number: usize,
    total: usize,
    question: &QuestionRecord,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Q{number}/{total}: {}", question.prompt())?;
    for (idx, option) in question.options().iter().enumerate() {
        writeln!(out, "  {}. {option}", idx + 1)?;
    }
    Ok(())
}

/// Print the verdict; a wrong answer shows the correct option with its number.
fn render_feedback(
    out: &mut impl Write,
    options: &[String],
    result: &QuizAnswerResult,
) -> io::Result<()> {
    let answer = &result.outcome.correct_answer;
    if result.outcome.correct {
        return writeln!(out, "Correct!");
    }
    match options.iter().position(|option| option == answer) {
        Some(idx) => writeln!(out, "Wrong! Correct answer: {}. {answer}", idx + 1),
        None => writeln!(out, "Wrong! Correct answer: {answer}"),
    }
}

/// Keep prompting until a valid choice is entered. `None` means end of input.
fn read_answer(
    session: &mut QuizSession,
    quiz_loop: &QuizLoopService,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<Option<QuizAnswerResult>> {
    let option_count = session
        .current_question()
        .map_or(0, |question| question.options().len());

    loop {
        write!(out, "Your answer (option number 1-{option_count}): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let choice = line.trim_end_matches(['\r', '\n']);
        if choice.trim().is_empty() {
            writeln!(out, "Please select an answer before submitting!")?;
            continue;
        }

        // An in-range number picks by position; anything else must be an exact option.
        let result = match choice.trim().parse::<usize>() {
            Ok(number) if (1..=option_count).contains(&number) => {
                quiz_loop.answer_by_number(session, number)
            }
            _ if is_option_text(session, choice) => quiz_loop
                .answer_current(session, choice)
                .map_err(AnswerError::from),
            _ => Err(AnswerError::NoSuchOption(0)),
        };

        match result {
            Ok(result) => return Ok(Some(result)),
            Err(AnswerError::NoSuchOption(_)) => {
                writeln!(out, "Please choose a number between 1 and {option_count}.")?;
            }
            Err(err) => return Err(io::Error::other(err)),
        }
    }
}

fn is_option_text(session: &QuizSession, choice: &str) -> bool {
    session
        .current_question()
        .is_some_and(|question| question.options().iter().any(|option| option == choice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcq_core::time::fixed_now;
    use services::Clock;
    use std::io::Cursor;

    fn session() -> QuizSession {
        let questions = vec![
            QuestionRecord::new("Capital of France?", vec!["Rome".into(), "Paris".into()], "Paris")
                .unwrap(),
            QuestionRecord::new("2+2?", vec!["4".into(), "5".into()], "4").unwrap(),
        ];
        QuizSession::new(questions, fixed_now()).unwrap()
    }

    fn run(input: &str) -> (QuizSummary, String) {
        let mut session = session();
        let quiz_loop = QuizLoopService::new(Clock::fixed(fixed_now()));
        let mut out = Vec::new();
        let summary = play(&mut session, &quiz_loop, Cursor::new(input), &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn numbered_answers_complete_the_quiz() {
        let (summary, out) = run("2\n1\n");
        assert_eq!((summary.score, summary.total), (2, 2));
        assert!(out.contains("Q1/2: Capital of France?"));
        assert!(out.contains("  2. Paris"));
        assert!(out.contains("Game over! Your score: 2/2 (100%)"));
    }

    #[test]
    fn wrong_answer_shows_correct_one() {
        let (summary, out) = run("1\n1\n");
        assert_eq!(summary.score, 1);
        assert!(out.contains("Wrong! Correct answer: 2. Paris"));
    }

    #[test]
    fn typed_option_text_is_accepted() {
        let (summary, out) = run("Paris\n5\n");
        assert_eq!((summary.score, summary.answered), (1, 2));
        assert!(out.contains("Correct!"));
        assert!(out.contains("Wrong! Correct answer: 1. 4"));
    }

    #[test]
    fn numeric_options_are_chosen_by_position() {
        let questions = vec![
            QuestionRecord::new(
                "2+2?",
                vec!["3".into(), "4".into(), "5".into(), "6".into()],
                "4",
            )
            .unwrap(),
        ];
        let mut session = QuizSession::new(questions, fixed_now()).unwrap();
        let quiz_loop = QuizLoopService::new(Clock::fixed(fixed_now()));
        let mut out = Vec::new();

        let summary = play(&mut session, &quiz_loop, Cursor::new("4\n"), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(summary.score, 0);
        assert_eq!(session.answer_log()[0].selected, "6");
        assert!(out.contains("Wrong! Correct answer: 2. 4"));
    }

    #[test]
    fn invalid_input_reprompts() {
        let (summary, out) = run("\n9\nLondon\n2\n1\n");
        assert_eq!(summary.score, 2);
        assert!(out.contains("Please select an answer before submitting!"));
        assert_eq!(out.matches("Please choose a number between 1 and 2.").count(), 2);
    }

    #[test]
    fn end_of_input_stops_early() {
        let (summary, out) = run("2\n");
        assert_eq!(summary.answered, 1);
        assert!(summary.completed_at.is_none());
        assert!(out.contains("Quiz stopped after 1 of 2 questions. Score: 1"));
    }
}
