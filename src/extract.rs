//! Tolerant JSON recovery from completion text.
//!
//! Models wrap JSON in prose, explanations, or markdown fences. Each
//! extractor makes two attempts:
//!
//! 1. Parse the span from the first opening delimiter to the last closing
//!    delimiter, inclusive.
//! 2. Strip code fences (```` ```json ```` and ```` ``` ````) from the whole
//!    text, trim, and parse what is left.
//!
//! If both fail the extractor returns [`ParseError`]. It never guesses at
//! a partial structure; callers decide on a fallback value, typically
//! through the `*_or` variants.

use std::ops::Range;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Completion text did not contain recoverable JSON of the expected shape.
#[derive(Debug, thiserror::Error)]
#[error("no JSON {expected} found in completion: {source}")]
pub struct ParseError {
    expected: &'static str,
    #[source]
    source: serde_json::Error,
}

impl ParseError {
    /// The shape that was requested: `"object"`, `"array"` or `"value"`.
    pub fn expected(&self) -> &'static str {
        self.expected
    }
}

/// Recover a JSON object from completion text.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, ParseError> {
    extract_shaped(text, '{', '}', "object")
}

/// Recover a JSON array from completion text.
pub fn extract_json_array(text: &str) -> Result<Vec<Value>, ParseError> {
    extract_shaped(text, '[', ']', "array")
}

/// Recover a JSON object, or `default` when none can be found.
pub fn extract_json_object_or(text: &str, default: Map<String, Value>) -> Map<String, Value> {
    extract_json_object(text).unwrap_or(default)
}

/// Recover a JSON array, or `default` when none can be found.
pub fn extract_json_array_or(text: &str, default: Vec<Value>) -> Vec<Value> {
    extract_json_array(text).unwrap_or(default)
}

/// Recover a typed value from whichever shape encloses the payload.
///
/// The shape whose opening delimiter comes first is the outermost one and
/// is tried first. Once a span parses as JSON it decides the result: a
/// value that does not fit `T` is an error, never a nested fragment.
/// The other shape is only tried when its span lies outside the first.
///
/// Useful when the caller has a concrete schema, e.g. `Vec<QuizQuestion>`
/// or a `Roadmap` struct.
pub fn extract_json_as<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
    let mut spans: Vec<Range<usize>> = [('{', '}'), ('[', ']')]
        .into_iter()
        .filter_map(|(open, close)| delimited_range(text, open, close))
        .collect();
    spans.sort_by_key(|span| span.start);

    let outer = spans.first().cloned();
    for span in &spans {
        let nested = outer
            .as_ref()
            .is_some_and(|o| span.start > o.start && span.end <= o.end);
        if nested {
            continue;
        }
        if let Ok(value) = serde_json::from_str::<Value>(&text[span.clone()]) {
            return serde_json::from_value(value).map_err(|source| ParseError {
                expected: "value",
                source,
            });
        }
    }
    serde_json::from_str(strip_code_fences(text).trim()).map_err(|source| ParseError {
        expected: "value",
        source,
    })
}

fn extract_shaped<T: DeserializeOwned>(
    text: &str,
    open: char,
    close: char,
    expected: &'static str,
) -> Result<T, ParseError> {
    if let Some(span) = delimited_span(text, open, close) {
        if let Ok(value) = serde_json::from_str(span) {
            return Ok(value);
        }
    }
    serde_json::from_str(strip_code_fences(text).trim())
        .map_err(|source| ParseError { expected, source })
}

/// First `open` through last `close`, inclusive, when correctly ordered.
fn delimited_span(text: &str, open: char, close: char) -> Option<&str> {
    delimited_range(text, open, close).map(|range| &text[range])
}

fn delimited_range(text: &str, open: char, close: char) -> Option<Range<usize>> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| start..end + close.len_utf8())
}

/// Remove ```` ```json ```` and ```` ``` ```` markers, each with one
/// optional trailing newline.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
}
