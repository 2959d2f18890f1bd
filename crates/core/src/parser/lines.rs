use crate::model::QuestionDraft;

use super::Batch;

const QUESTION_MARKER: &str = "Question:";
const OPTIONS_MARKER: &str = "Options:";
const ANSWER_MARKER: &str = "Answer:";

/// Fields observed so far for the record being assembled.
#[derive(Debug, Default)]
struct Pending {
    question: Option<String>,
    /// `Some(None)` when an options line was seen but could not be decoded.
    options: Option<Option<Vec<String>>>,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.question.is_none() && self.options.is_none()
    }
}

/// Parse the line-oriented `Question:` / `Options:` / `Answer:` format.
///
/// Returns `None` when no field marker appears anywhere in the text.
pub(super) fn batch_from_lines(text: &str) -> Option<Batch> {
    let mut batch = Batch::default();
    let mut pending = Pending::default();
    let mut saw_marker = false;
    let mut position = 0_usize;

    for raw in text.lines() {
        let line = strip_numbering(strip_bullet(raw.trim()));

        if let Some(rest) = line.strip_prefix(QUESTION_MARKER) {
            saw_marker = true;
            if pending.question.is_some() {
                log::debug!("question #{position} has no answer line; skipping");
                batch.skipped += 1;
                position += 1;
            }
            pending = Pending {
                question: Some(rest.trim().to_owned()),
                options: None,
            };
        } else if let Some(rest) = line.strip_prefix(OPTIONS_MARKER) {
            saw_marker = true;
            pending.options = Some(decode_options(rest));
        } else if let Some(rest) = line.strip_prefix(ANSWER_MARKER) {
            saw_marker = true;
            let answer = rest.trim().to_owned();
            match std::mem::take(&mut pending) {
                Pending {
                    question: Some(question),
                    options: Some(Some(options)),
                } => batch.push_draft(position, QuestionDraft::new(question, options, answer)),
                _ => {
                    log::debug!("question #{position} is incomplete; skipping");
                    batch.skipped += 1;
                }
            }
            position += 1;
        }
    }

    if !pending.is_empty() {
        log::debug!("trailing question #{position} has no answer line; skipping");
        batch.skipped += 1;
    }

    saw_marker.then_some(batch)
}

/// Decode the options list as a JSON array of strings.
///
/// The text comes straight from a network response, so it is only ever
/// handed to a data parser.
fn decode_options(raw: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Vec<String>>(raw.trim()) {
        Ok(options) => Some(options),
        Err(err) => {
            log::debug!("undecodable options list {raw:?}: {err}");
            None
        }
    }
}

fn strip_bullet(line: &str) -> &str {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .map_or(line, str::trim_start)
}

/// Drop a leading question number such as `1.`, `2)` or `Q3.`.
fn strip_numbering(line: &str) -> &str {
    let rest = line.strip_prefix('Q').unwrap_or(line);
    let after_digits = rest.trim_start_matches(|c: char| c.is_ascii_digit());
    if after_digits.len() == rest.len() {
        return line;
    }
    after_digits
        .strip_prefix(['.', ')', ':'])
        .map_or(line, str::trim_start)
}
