//! Side-effect grading: were the expected API calls observed?

use std::collections::BTreeMap;

use tracing::debug;

use super::report::{CallMismatch, GroupReport};
use crate::error::Result;
use crate::matcher::matches;
use crate::task::{ExpectedCall, SideEffectAnswer};
use crate::trace::NetworkEvent;

/// Grades a trace against side-effect ground truth.
///
/// Alternative groups are tried in order until one passes. Returns whether
/// any group passed and a report for every group tried.
///
/// # Errors
///
/// Returns an error if the matcher rejects a constraint as malformed.
pub(super) fn grade(
    answer: &SideEffectAnswer,
    events: &[NetworkEvent],
) -> Result<(bool, Vec<GroupReport>)> {
    match answer {
        SideEffectAnswer::Calls(calls) => {
            let report = grade_group(None, calls, events)?;
            Ok((report.passed, vec![report]))
        }
        SideEffectAnswer::Options(options) => {
            let mut reports = Vec::new();
            for option in options {
                let report = grade_group(Some(&option.answer_id), &option.calls, events)?;
                let passed = report.passed;
                reports.push(report);
                if passed {
                    debug!(answer_id = %option.answer_id, "answer option satisfied");
                    return Ok((true, reports));
                }
            }
            Ok((false, reports))
        }
    }
}

/// Checks that every call in a group is matched by some event, in any order.
fn grade_group(
    answer_id: Option<&str>,
    calls: &[ExpectedCall],
    events: &[NetworkEvent],
) -> Result<GroupReport> {
    let mut satisfied = vec![false; calls.len()];
    let mut mismatches = BTreeMap::new();

    for (index, event) in events.iter().enumerate() {
        if satisfied.iter().all(|done| *done) {
            break;
        }
        let mut failures = Vec::new();
        for (call, done) in calls.iter().zip(satisfied.iter_mut()) {
            if *done {
                continue;
            }
            let outcome = matches(event, call)?;
            if outcome.matched {
                *done = true;
            } else {
                failures.push(CallMismatch { call: call.label(), errors: outcome.errors });
            }
        }
        if !failures.is_empty() {
            mismatches.insert(index, failures);
        }
    }

    let unsatisfied: Vec<String> = calls
        .iter()
        .zip(&satisfied)
        .filter(|(_, done)| !**done)
        .map(|(call, _)| call.label())
        .collect();
    let passed = unsatisfied.is_empty();
    if passed {
        mismatches.clear();
    }
    Ok(GroupReport { answer_id: answer_id.map(String::from), passed, unsatisfied, mismatches })
}
