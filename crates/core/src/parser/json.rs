use serde_json::{Map, Value};

use crate::model::QuestionDraft;

use super::Batch;

/// Keys searched, in order, for the question array of an object root.
const PREFERRED_KEYS: [&str; 2] = ["mcqs", "questions"];

/// Collect question records from a parsed JSON document.
///
/// An object carrying a `question` key is read as a single question;
/// otherwise the document must hold an array of question objects, or `None`
/// is returned.
pub(super) fn batch_from_value(value: Value) -> Option<Batch> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) if map.contains_key("question") => vec![Value::Object(map)],
        Value::Object(map) => question_array(map)?,
        _ => return None,
    };

    let mut batch = Batch::default();
    for (position, item) in items.into_iter().enumerate() {
        let draft = match serde_json::from_value::<QuestionDraft>(item) {
            Ok(draft) => draft,
            Err(err) => {
                log::debug!("skipping question #{position}: {err}");
                batch.skipped += 1;
                continue;
            }
        };
        batch.push_draft(position, draft);
    }
    Some(batch)
}

fn question_array(mut map: Map<String, Value>) -> Option<Vec<Value>> {
    for key in PREFERRED_KEYS {
        if let Some(Value::Array(items)) = map.remove(key) {
            return Some(items);
        }
    }

    map.into_iter().find_map(|(_, value)| match value {
        Value::Array(items) => Some(items),
        _ => None,
    })
}

/// Find a JSON object or array embedded in surrounding prose and parse it.
///
/// The bracket pair that opens first is tried first, so a bare array of
/// question objects is not mistaken for its first element.
pub(super) fn embedded_value(text: &str) -> Option<Value> {
    let mut spans: Vec<_> = [outer_span(text, '{', '}'), outer_span(text, '[', ']')]
        .into_iter()
        .flatten()
        .collect();
    spans.sort_unstable();
    spans
        .into_iter()
        .find_map(|(start, end)| serde_json::from_str(&text[start..=end]).ok())
}

/// Byte range from the first `open` to the last `close`, if well ordered.
fn outer_span(text: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then_some((start, end))
}
