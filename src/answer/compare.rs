//! Comparison of an extracted answer against the reference.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::extract::{extract, ExtractedAnswer, DATE_TIME_FORMAT};
use crate::task::{AnswerValue, InformationSeekingAnswer};

/// Result of grading a stated answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The stated answer equals the reference.
    Correct,
    /// An answer was stated but differs from the reference.
    Incorrect,
    /// No answer of the expected type could be extracted.
    NotFound,
}

/// Outcome of grading plus what was observed.
#[derive(Debug, Clone, PartialEq)]
pub struct Judgement {
    /// Verdict.
    pub outcome: Outcome,
    /// Extracted value, converted to UTC for date-times.
    pub observed: Option<AnswerValue>,
    /// How a local date-time was converted, or why it could not be.
    pub timezone_note: Option<String>,
}

/// Grades free text against an Information Seeking reference.
///
/// Date-times stated by the agent are read as wall-clock time in `timezone`.
#[must_use]
pub fn judge(answer: &InformationSeekingAnswer, text: &str, timezone: Tz) -> Judgement {
    let mut timezone_note = None;
    let observed = match extract(answer.answer_type, text) {
        None => None,
        Some(ExtractedAnswer::Text(s)) => Some(AnswerValue::Text(s)),
        Some(ExtractedAnswer::Integer(n)) => Some(AnswerValue::Integer(n)),
        Some(ExtractedAnswer::Float(n)) => Some(AnswerValue::Float(n)),
        Some(ExtractedAnswer::LocalDateTime(local)) => {
            let converted = localize_to_utc(local, timezone);
            let local = local.format(DATE_TIME_FORMAT);
            timezone_note = Some(match converted {
                Some(utc) => format!("{local} in {timezone} is {}", utc.format("%Y-%m-%dT%H:%M:%SZ")),
                None => format!("{local} does not exist in {timezone}"),
            });
            converted.map(AnswerValue::DateTime)
        }
    };

    let outcome = match &observed {
        None => Outcome::NotFound,
        Some(value) if answer.reference.accepts(value) => Outcome::Correct,
        Some(_) => Outcome::Incorrect,
    };
    Judgement { outcome, observed, timezone_note }
}

/// Converts a wall-clock time in `timezone` to UTC.
///
/// An ambiguous time (clocks going back) resolves to the earlier instant.
/// Returns `None` for a time skipped by a forward transition.
#[must_use]
pub fn localize_to_utc(local: NaiveDateTime, timezone: Tz) -> Option<DateTime<Utc>> {
    match timezone.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}
