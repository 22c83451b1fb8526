//! Request matching: does one observed network event satisfy one expected call?
//!
//! Matching runs in three stages (method, path, then body constraints). The
//! first two stop at the first failure; every body constraint is checked so
//! the report lists all of them.

mod body;
mod path;

use serde::Serialize;

use crate::error::Result;
use crate::task::ExpectedCall;
use crate::trace::NetworkEvent;

/// Verdict of matching one event against one expected call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    /// Whether every stage passed.
    pub matched: bool,
    /// Human-readable reasons for failure, empty on a match.
    pub errors: Vec<String>,
}

impl MatchOutcome {
    fn failed(errors: Vec<String>) -> Self {
        Self { matched: false, errors }
    }
}

/// Matches an observed event against an expected call.
///
/// # Errors
///
/// Returns an error when a body operator meets a value of the wrong shape
/// or cannot coerce its operand. Both indicate malformed ground truth.
pub fn matches(event: &NetworkEvent, expected: &ExpectedCall) -> Result<MatchOutcome> {
    if event.method != expected.method {
        return Ok(MatchOutcome::failed(vec![format!(
            "method {} does not match expected {}",
            event.method, expected.method
        )]));
    }

    let mut errors = Vec::new();
    if !path::check(event, &expected.path, &mut errors) {
        return Ok(MatchOutcome::failed(errors));
    }

    for (key, expectation) in &expected.request_kv {
        let mut mismatches = Vec::new();
        if body::check(&event.body, key, expectation, &mut mismatches)? {
            continue;
        }
        if mismatches.is_empty() {
            errors.push(format!("'{key}' not found in request body"));
        } else {
            for mismatch in mismatches {
                errors.push(format!("'{key}' expected {expectation}, {mismatch}"));
            }
        }
    }

    if errors.is_empty() {
        return Ok(MatchOutcome { matched: true, errors });
    }
    errors.push(format!("observed body: {}", serde_json::Value::Object(event.body.clone())));
    Ok(MatchOutcome::failed(errors))
}
