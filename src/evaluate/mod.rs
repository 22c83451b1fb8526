//! Grading of loaded artifacts against the task registry.

mod information;
mod report;
mod side_effect;

pub use report::{
    CallMismatch, EvaluationDetail, EvaluationReport, EvaluationResult, GroupReport, Percentage,
    Status,
};

use tracing::{error, info};

use crate::config::EvalConfig;
use crate::error::{EvalError, Result};
use crate::task::{GroundTruth, TaskInstance, TaskRegistry};
use crate::trace::Artifacts;

/// Grades every registered instance that has artifacts.
pub struct Evaluator<'a> {
    registry: &'a TaskRegistry,
    config: EvalConfig,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator over `registry`.
    #[must_use]
    pub fn new(registry: &'a TaskRegistry, config: EvalConfig) -> Self {
        Self { registry, config }
    }

    /// Counts of loaded tasks and artifacts.
    #[must_use]
    pub fn status(&self, artifacts: &Artifacts) -> Status {
        Status {
            tasks: self.registry.tasks().len(),
            instances: self.registry.instance_count(),
            network_logs: artifacts.network_log_count(),
            outputs: artifacts.output_count(),
        }
    }

    /// Grades all instances in registry order.
    ///
    /// An instance that cannot be graded is reported as an error result and
    /// does not affect the others.
    #[must_use]
    pub fn evaluate(&self, artifacts: &Artifacts) -> EvaluationReport {
        let mut results = Vec::new();
        let mut unevaluated = Vec::new();
        for instance in self.registry.instances() {
            match self.evaluate_instance(instance, artifacts) {
                Some(result) => results.push(result),
                None => unevaluated.push(instance.id.clone()),
            }
        }
        let report =
            EvaluationReport::from_results(results, unevaluated, self.config.timezone.to_string());
        info!(
            correct = report.correct,
            incorrect = report.incorrect,
            errored = report.errored,
            unevaluated = report.unevaluated.len(),
            "evaluation finished"
        );
        report
    }

    /// Grades one instance, or returns `None` if it has no artifacts to grade.
    ///
    /// An artifact that failed to load makes the result an error.
    #[must_use]
    pub fn evaluate_instance(
        &self,
        instance: &TaskInstance,
        artifacts: &Artifacts,
    ) -> Option<EvaluationResult> {
        let graded = if let Some(failure) = artifacts.failure(&instance.id) {
            Err(failure.to_string())
        } else {
            self.grade(instance, artifacts)?.map_err(|e| e.to_string())
        };

        let (correct, detail) = graded.unwrap_or_else(|message| {
            error!(instance_id = %instance.id, error = %message, "instance could not be graded");
            (false, EvaluationDetail::Error { message })
        });
        info!(instance_id = %instance.id, correct, "graded");
        Some(EvaluationResult {
            instance_id: instance.id.clone(),
            task_id: instance.task_id.clone(),
            correct,
            detail,
        })
    }

    fn grade(
        &self,
        instance: &TaskInstance,
        artifacts: &Artifacts,
    ) -> Option<Result<(bool, EvaluationDetail)>> {
        let graded = match &instance.ground_truth {
            GroundTruth::SideEffect(answer) => {
                let events = artifacts.events(&instance.id)?;
                self.owning_task(instance)
                    .and_then(|()| side_effect::grade(answer, events))
                    .map(|(correct, groups)| (correct, EvaluationDetail::SideEffect { groups }))
            }
            GroundTruth::InformationSeeking(answer) => {
                let output = artifacts.output(&instance.id)?;
                self.owning_task(instance)
                    .map(|()| information::grade(answer, output, self.config.timezone))
            }
        };
        Some(graded)
    }

    fn owning_task(&self, instance: &TaskInstance) -> Result<()> {
        match self.registry.task(&instance.task_id) {
            Some(_) => Ok(()),
            None => Err(EvalError::UnknownTask { instance_id: instance.id.clone() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{NetworkEvent, ObservedOutput};
    use serde_json::{json, Map, Value};

    fn registry(tasks: Value) -> TaskRegistry {
        TaskRegistry::from_json(&tasks.to_string()).unwrap().0
    }

    fn post(url: &str, body: Value) -> NetworkEvent {
        let Value::Object(body) = body else {
            return NetworkEvent::from_url(0, "POST", url, Map::new()).unwrap();
        };
        NetworkEvent::from_url(0, "POST", url, body).unwrap()
    }

    fn syllabus_registry() -> TaskRegistry {
        registry(json!([
            {"id": "create-page", "type": "Side-effect", "instances": [
                {"id": "cp-1", "answer_key": [
                    {"method": "POST", "path": "/courses/5/pages", "request_kv": {"title": "Syllabus"}}
                ]},
                {"id": "cp-2", "answer_key": [
                    {"method": "POST", "path": "/courses/6/pages", "request_kv": {"title": "Syllabus"}}
                ]}
            ]},
            {"id": "count-modules", "type": "Information Seeking", "answer_type": "Numeric", "instances": [
                {"id": "cm-1", "answer_key": {"Numeric": 4}}
            ]}
        ]))
    }

    #[test]
    fn syllabus_page_scores_correct_with_empty_mismatches() {
        let registry = syllabus_registry();
        let mut artifacts = Artifacts::new();
        artifacts.register_events("cp-1", vec![post("/courses/5/pages", json!({"title": "Syllabus"}))]);

        let report = Evaluator::new(&registry, EvalConfig::default()).evaluate(&artifacts);

        assert_eq!(report.correct, 1);
        assert_eq!(report.percentage, Percentage::Value(100.0));
        let EvaluationDetail::SideEffect { groups } = &report.results[0].detail else {
            panic!("expected side-effect detail");
        };
        assert!(groups[0].passed);
        assert!(groups[0].mismatches.is_empty());
        assert_eq!(report.unevaluated, vec!["cp-2", "cm-1"]);
    }

    #[test]
    fn information_seeking_uses_transcript() {
        let registry = syllabus_registry();
        let mut artifacts = Artifacts::new();
        artifacts.register_output(ObservedOutput {
            instance_id: "cm-1".into(),
            text: "There are four.\nAnswer: 4".into(),
            well_formed: true,
        });
        let report = Evaluator::new(&registry, EvalConfig::default()).evaluate(&artifacts);
        assert_eq!(report.correct, 1);
        assert_eq!(report.results[0].instance_id, "cm-1");
    }

    #[test]
    fn fatal_error_in_one_instance_leaves_others_scored() {
        let registry = registry(json!([
            {"id": "tag", "type": "Side-effect", "instances": [
                {"id": "bad", "answer_key": [
                    {"method": "PUT", "path": "/p", "request_kv": {"tags": "[[_array_contains='x']]"}}
                ]},
                {"id": "good", "answer_key": [{"method": "PUT", "path": "/p"}]}
            ]}
        ]));
        let mut artifacts = Artifacts::new();
        let event = NetworkEvent::from_url(0, "PUT", "/p", {
            let mut body = Map::new();
            body.insert("tags".into(), json!("not-an-array"));
            body
        })
        .unwrap();
        artifacts.register_events("bad", vec![event.clone()]);
        artifacts.register_events("good", vec![event]);

        let report = Evaluator::new(&registry, EvalConfig::default()).evaluate(&artifacts);

        assert_eq!(report.errored, 1);
        assert_eq!(report.correct, 1);
        assert!(report.results[0].is_error());
        assert_eq!(report.percentage, Percentage::Value(100.0));
    }

    #[test]
    fn unusable_trace_is_counted_as_error() {
        let registry = syllabus_registry();
        let mut artifacts = Artifacts::new();
        artifacts.register_failure(
            "cp-1",
            EvalError::UnsupportedContentType {
                content_type: "text/plain".into(),
                url: "http://localhost:8088/courses/5/pages".into(),
            },
        );

        let report = Evaluator::new(&registry, EvalConfig::default()).evaluate(&artifacts);

        assert_eq!(report.errored, 1);
        assert_eq!(report.results[0].instance_id, "cp-1");
        let EvaluationDetail::Error { message } = &report.results[0].detail else {
            panic!("expected error detail");
        };
        assert!(message.contains("text/plain"));
        assert!(!report.unevaluated.contains(&"cp-1".to_string()));
        assert_eq!(report.percentage, Percentage::NotApplicable);
    }

    #[test]
    fn status_counts_loaded_artifacts() {
        let registry = syllabus_registry();
        let mut artifacts = Artifacts::new();
        artifacts.register_events("cp-1", Vec::new());
        let status = Evaluator::new(&registry, EvalConfig::default()).status(&artifacts);
        assert_eq!(status, Status { tasks: 2, instances: 3, network_logs: 1, outputs: 0 });
    }

    #[test]
    fn empty_trace_is_graded_incorrect() {
        let registry = syllabus_registry();
        let mut artifacts = Artifacts::new();
        artifacts.register_events("cp-2", Vec::new());
        let report = Evaluator::new(&registry, EvalConfig::default()).evaluate(&artifacts);
        assert_eq!(report.incorrect, 1);
        assert_eq!(report.percentage, Percentage::Value(0.0));
    }
}
