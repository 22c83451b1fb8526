//! Pattern-based extraction of a typed answer from free text.
//!
//! Agents are asked to finish with a line such as `Answer: 42`. Both
//! `Answer: ` and `ANSWER; ` are accepted as the marker.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::task::AnswerType;

const MARKER: &str = r"(?:Answer: |ANSWER; )";

/// Date-time layout agents are asked to answer in.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{MARKER}(\d{{4}}-\d{{1,2}}-\d{{1,2}} \d{{1,2}}:\d{{2}})"))
        .expect("date-time answer pattern is valid")
});

static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{MARKER}(\d+\.\d+)")).expect("float answer pattern is valid")
});

static INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{MARKER}(\d+)")).expect("integer answer pattern is valid")
});

static TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?s){MARKER}'?(.*)'")).expect("text answer pattern is valid")
});

/// An answer as stated by the agent, before any timezone conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedAnswer {
    /// Quoted text.
    Text(String),
    /// Whole number. Larger than `i64` holds falls back to [`ExtractedAnswer::Float`].
    Integer(i64),
    /// Decimal number.
    Float(f64),
    /// Wall-clock date-time in the agent's local timezone.
    LocalDateTime(NaiveDateTime),
}

/// Extracts an answer of the given type from `text`.
///
/// Returns `None` when no marker is followed by a value of that type.
#[must_use]
pub fn extract(answer_type: AnswerType, text: &str) -> Option<ExtractedAnswer> {
    match answer_type {
        AnswerType::DateTime => {
            let raw = capture(&DATE_TIME, text)?;
            NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT)
                .ok()
                .map(ExtractedAnswer::LocalDateTime)
        }
        AnswerType::Numeric => capture(&FLOAT, text)
            .and_then(|raw| raw.parse().ok())
            .map(ExtractedAnswer::Float)
            .or_else(|| {
                let raw = capture(&INTEGER, text)?;
                raw.parse()
                    .map(ExtractedAnswer::Integer)
                    .ok()
                    .or_else(|| raw.parse().ok().map(ExtractedAnswer::Float))
            }),
        AnswerType::Text => capture(&TEXT, text).map(|raw| ExtractedAnswer::Text(raw.to_string())),
    }
}

fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}
