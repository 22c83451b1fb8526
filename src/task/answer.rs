//! Typed reference answers for Information Seeking tasks.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Format of the answer an Information Seeking task expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnswerType {
    /// Free text, quoted in the agent's answer.
    Text,
    /// An integer or decimal number.
    Numeric,
    /// A date and time to minute precision.
    #[serde(rename = "Date Time")]
    DateTime,
}

impl AnswerType {
    /// Parses a ground-truth label. `"Number"` is accepted as a synonym of `"Numeric"`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Text" => Some(Self::Text),
            "Numeric" | "Number" => Some(Self::Numeric),
            "Date Time" => Some(Self::DateTime),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "Text",
            Self::Numeric => "Numeric",
            Self::DateTime => "Date Time",
        })
    }
}

/// A typed answer value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Text answer.
    Text(String),
    /// Whole-number answer.
    Integer(i64),
    /// Decimal answer.
    Float(f64),
    /// Instant in UTC.
    DateTime(DateTime<Utc>),
}

impl AnswerValue {
    /// Compares two answers. Integers and floats compare numerically.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
                let same = *a as f64 == *b;
                same
            }
            _ => self == other,
        }
    }

    fn parse(answer_type: AnswerType, value: &Value) -> Result<Self, String> {
        match (answer_type, value) {
            (AnswerType::Text, Value::String(s)) => Ok(Self::Text(s.clone())),
            (AnswerType::Text, Value::Number(n)) => Ok(Self::Text(n.to_string())),
            (AnswerType::Numeric, Value::Number(n)) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float))
                .ok_or_else(|| format!("unrepresentable number {n}")),
            (AnswerType::Numeric, Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .map(Self::Integer)
                    .or_else(|_| s.parse::<f64>().map(Self::Float))
                    .map_err(|_| format!("'{s}' is not a number"))
            }
            (AnswerType::DateTime, Value::String(s)) => parse_utc(s).map(Self::DateTime),
            (kind, other) => Err(format!("{other} is not a valid {kind} answer")),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

/// The reference answer for an Information Seeking instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReferenceAnswer {
    /// Exactly one acceptable value.
    Single(AnswerValue),
    /// Any of these values is acceptable.
    OneOf(Vec<AnswerValue>),
}

impl ReferenceAnswer {
    /// Parses a reference literal, or array of literals, as the given answer type.
    ///
    /// # Errors
    ///
    /// Returns a reason string when a value does not fit the answer type or
    /// an array is empty.
    pub fn parse(answer_type: AnswerType, value: &Value) -> Result<Self, String> {
        match value {
            Value::Array(items) if items.is_empty() => {
                Err("reference answer lists no acceptable values".to_string())
            }
            Value::Array(items) => items
                .iter()
                .map(|item| AnswerValue::parse(answer_type, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::OneOf),
            single => AnswerValue::parse(answer_type, single).map(Self::Single),
        }
    }

    /// Returns `true` if `observed` equals the reference or any acceptable value.
    #[must_use]
    pub fn accepts(&self, observed: &AnswerValue) -> bool {
        match self {
            Self::Single(value) => value.same_as(observed),
            Self::OneOf(values) => values.iter().any(|value| value.same_as(observed)),
        }
    }
}

/// Information Seeking ground truth.
#[derive(Debug, Clone, PartialEq)]
pub struct InformationSeekingAnswer {
    /// Format the agent must answer in.
    pub answer_type: AnswerType,
    /// Acceptable value(s).
    pub reference: ReferenceAnswer,
}

/// Parses a reference date-time authored in UTC.
///
/// Accepts RFC 3339 or naive `YYYY-MM-DD HH:MM[:SS]`, which is read as UTC.
fn parse_utc(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{raw}' is not a recognised date-time"))
}
