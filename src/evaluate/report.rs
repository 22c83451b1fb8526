//! Evaluation results and the aggregate report.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::answer::Outcome;
use crate::task::{AnswerValue, LoadIssue, ReferenceAnswer};

/// Why one observed event failed to match one still-unsatisfied expected call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallMismatch {
    /// `METHOD path` of the expected call.
    pub call: String,
    /// Matcher diagnostics.
    pub errors: Vec<String>,
}

/// How one answer-option group fared against the trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    /// Grouping tag, absent for single-group ground truth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<String>,
    /// Whether every call in the group was observed.
    pub passed: bool,
    /// Expected calls no event satisfied.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unsatisfied: Vec<String>,
    /// Matcher diagnostics keyed by observed event index. Empty for passing groups.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub mismatches: BTreeMap<usize, Vec<CallMismatch>>,
}

/// Category-specific detail of an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationDetail {
    /// Side-effect grading.
    SideEffect {
        /// Groups tried, in order, up to and including the first that passed.
        groups: Vec<GroupReport>,
    },
    /// Information Seeking grading.
    InformationSeeking {
        /// Verdict of the answer engine.
        outcome: Outcome,
        /// Extracted answer, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        observed: Option<AnswerValue>,
        /// Acceptable answer(s).
        reference: ReferenceAnswer,
        /// Timezone conversion applied to a date-time answer.
        #[serde(skip_serializing_if = "Option::is_none")]
        timezone_note: Option<String>,
        /// The agent's final message, kept unless the answer was correct.
        #[serde(skip_serializing_if = "Option::is_none")]
        raw_output: Option<String>,
    },
    /// The instance could not be graded.
    Error {
        /// What went wrong.
        message: String,
    },
}

/// Verdict for one task instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    /// Instance graded.
    pub instance_id: String,
    /// Owning task.
    pub task_id: String,
    /// Whether the agent completed the instance.
    pub correct: bool,
    /// Diagnostics.
    pub detail: EvaluationDetail,
}

impl EvaluationResult {
    /// Whether grading hit a fatal error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.detail, EvaluationDetail::Error { .. })
    }
}

/// Share of scored instances that were correct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Percentage {
    /// Percentage in `0.0..=100.0`.
    Value(f64),
    /// Nothing was scored.
    NotApplicable,
}

impl Percentage {
    /// `correct / (correct + incorrect) * 100`, or not applicable when both are zero.
    #[must_use]
    pub fn of(correct: usize, incorrect: usize) -> Self {
        let scored = correct + incorrect;
        if scored == 0 {
            return Self::NotApplicable;
        }
        #[allow(clippy::cast_precision_loss)]
        let value = correct as f64 / scored as f64 * 100.0;
        Self::Value(value)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value:.2}%"),
            Self::NotApplicable => f.write_str("N/A"),
        }
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => serializer.serialize_f64(*value),
            Self::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

/// Aggregate outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Instances graded correct.
    pub correct: usize,
    /// Instances graded incorrect.
    pub incorrect: usize,
    /// Instances that could not be graded.
    pub errored: usize,
    /// Correct share of scored instances; errors are excluded.
    pub percentage: Percentage,
    /// Zone agent date-times were read in.
    pub timezone: String,
    /// Per-instance verdicts in registry order.
    pub results: Vec<EvaluationResult>,
    /// Registered instances with no artifacts to grade.
    pub unevaluated: Vec<String>,
    /// Tasks and instances skipped while loading definitions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub load_issues: Vec<LoadIssue>,
}

impl EvaluationReport {
    /// Aggregates per-instance results.
    #[must_use]
    pub fn from_results(
        results: Vec<EvaluationResult>,
        unevaluated: Vec<String>,
        timezone: String,
    ) -> Self {
        let errored = results.iter().filter(|r| r.is_error()).count();
        let correct = results.iter().filter(|r| r.correct).count();
        let incorrect = results.len() - errored - correct;
        Self {
            correct,
            incorrect,
            errored,
            percentage: Percentage::of(correct, incorrect),
            timezone,
            results,
            unevaluated,
            load_issues: Vec::new(),
        }
    }

    /// Attaches the issues met while loading task definitions.
    #[must_use]
    pub fn with_load_issues(mut self, load_issues: Vec<LoadIssue>) -> Self {
        self.load_issues = load_issues;
        self
    }

    /// One-line summary for the console.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} correct, {} incorrect, {} errored ({}); {} not evaluated",
            self.correct,
            self.incorrect,
            self.errored,
            self.percentage,
            self.unevaluated.len()
        )
    }
}

/// Counts of what has been loaded, printed before evaluating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Status {
    /// Registered tasks.
    pub tasks: usize,
    /// Registered task instances.
    pub instances: usize,
    /// Instances with at least one network log.
    pub network_logs: usize,
    /// Instances with a final output.
    pub outputs: usize,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tasks: {}\nTask Instances: {}\nNetwork Logs: {}\nOutputs: {}",
            self.tasks, self.instances, self.network_logs, self.outputs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, correct: bool, error: bool) -> EvaluationResult {
        let detail = if error {
            EvaluationDetail::Error { message: "boom".into() }
        } else {
            EvaluationDetail::SideEffect { groups: Vec::new() }
        };
        EvaluationResult { instance_id: id.into(), task_id: "t".into(), correct, detail }
    }

    #[test]
    fn three_of_four_is_seventy_five_percent() {
        let results = vec![
            result("a", true, false),
            result("b", true, false),
            result("c", true, false),
            result("d", false, false),
        ];
        let report = EvaluationReport::from_results(results, Vec::new(), "UTC".into());
        assert_eq!(report.percentage, Percentage::Value(75.0));
        assert_eq!(report.incorrect, 1);
    }

    #[test]
    fn nothing_scored_is_not_applicable() {
        let report = EvaluationReport::from_results(Vec::new(), vec!["x".into()], "UTC".into());
        assert_eq!(report.percentage, Percentage::NotApplicable);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["percentage"], "N/A");
    }

    #[test]
    fn errors_are_excluded_from_percentage() {
        let results = vec![result("a", true, false), result("b", false, true)];
        let report = EvaluationReport::from_results(results, Vec::new(), "UTC".into());
        assert_eq!(report.errored, 1);
        assert_eq!(report.incorrect, 0);
        assert_eq!(report.percentage, Percentage::Value(100.0));
    }

    #[test]
    fn only_errors_is_not_applicable() {
        let report =
            EvaluationReport::from_results(vec![result("a", false, true)], Vec::new(), "UTC".into());
        assert_eq!(report.percentage, Percentage::NotApplicable);
    }

    #[test]
    fn load_issues_are_serialized_when_present() {
        let empty = serde_json::to_value(EvaluationReport::from_results(
            Vec::new(),
            Vec::new(),
            "UTC".into(),
        ))
        .unwrap();
        assert!(empty.get("load_issues").is_none());

        let report = EvaluationReport::from_results(Vec::new(), Vec::new(), "UTC".into())
            .with_load_issues(vec![LoadIssue {
                task_id: Some("navigate".into()),
                instance_id: None,
                reason: "unknown category 'Navigation' for task navigate".into(),
            }]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["load_issues"][0]["task_id"], "navigate");
        assert!(json["load_issues"][0].get("instance_id").is_none());
    }

    #[test]
    fn detail_is_tagged_by_kind() {
        let json = serde_json::to_value(result("a", false, true)).unwrap();
        assert_eq!(json["detail"]["kind"], "error");
        assert_eq!(json["detail"]["message"], "boom");
    }

    #[test]
    fn status_matches_console_layout() {
        let status = Status { tasks: 2, instances: 5, network_logs: 3, outputs: 1 };
        assert_eq!(status.to_string(), "Tasks: 2\nTask Instances: 5\nNetwork Logs: 3\nOutputs: 1");
    }
}
