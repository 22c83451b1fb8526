//! Tasks, task instances, and their resolved ground truth.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::answer::{AnswerType, InformationSeekingAnswer, ReferenceAnswer};
use super::call::SideEffectAnswer;
use super::definition::{ExpectedCallDefinition, InstanceDefinition};
use crate::error::{EvalError, Result};

/// How a task is graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskCategory {
    /// Graded by observing backend API calls.
    #[serde(rename = "Side-effect")]
    SideEffect,
    /// Graded by comparing the agent's stated answer.
    #[serde(rename = "Information Seeking")]
    InformationSeeking,
}

impl TaskCategory {
    /// Parses the `type` label used in `tasks.json`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Side-effect" => Some(Self::SideEffect),
            "Information Seeking" => Some(Self::InformationSeeking),
            _ => None,
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SideEffect => "Side-effect",
            Self::InformationSeeking => "Information Seeking",
        })
    }
}

/// Ground truth for one instance, resolved at load time.
#[derive(Debug, Clone)]
pub enum GroundTruth {
    /// Expected API calls.
    SideEffect(SideEffectAnswer),
    /// Expected stated answer.
    InformationSeeking(InformationSeekingAnswer),
}

/// A benchmark task and its instances. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Grading category.
    pub category: TaskCategory,
    /// Declared answer format for Information Seeking tasks.
    pub answer_type: Option<AnswerType>,
    /// Task text with parameter placeholders.
    pub parameterized_text: String,
    /// Parameter definitions.
    pub parameters: Value,
    /// Instances in definition order.
    pub instances: Vec<TaskInstance>,
}

/// A concrete instance of a task.
#[derive(Debug, Clone)]
pub struct TaskInstance {
    /// Unique instance identifier.
    pub id: String,
    /// Identifier of the owning task.
    pub task_id: String,
    /// Task text with parameters substituted.
    pub instance_text: String,
    /// Parameter values for this instance.
    pub mapping: Value,
    /// Executor login name, when the instance runs under its own account.
    pub username: Option<String>,
    /// Executor password, when the instance runs under its own account.
    pub password: Option<String>,
    /// Resolved ground truth.
    pub ground_truth: GroundTruth,
}

impl TaskInstance {
    /// Resolves an instance definition under its task's category.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MissingReferenceAnswer`] for an Information Seeking
    /// instance with no answer key, and [`EvalError::InvalidGroundTruth`] or an
    /// operator/path error when the answer key cannot be interpreted.
    pub fn from_definition(
        task_id: &str,
        category: TaskCategory,
        declared_type: Option<AnswerType>,
        def: &InstanceDefinition,
    ) -> Result<Self> {
        let ground_truth = match category {
            TaskCategory::SideEffect => side_effect_truth(def)?,
            TaskCategory::InformationSeeking => information_truth(declared_type, def)?,
        };
        Ok(Self {
            id: def.id.clone(),
            task_id: task_id.to_string(),
            instance_text: def.instance_text.clone(),
            mapping: def.mapping.clone(),
            username: def.instance_username.clone(),
            password: def.instance_password.clone(),
            ground_truth,
        })
    }
}

fn invalid(def: &InstanceDefinition, reason: impl Into<String>) -> EvalError {
    EvalError::InvalidGroundTruth { instance_id: def.id.clone(), reason: reason.into() }
}

fn side_effect_truth(def: &InstanceDefinition) -> Result<GroundTruth> {
    let raw = def.answer_key.as_ref().ok_or_else(|| invalid(def, "answer_key is missing"))?;
    let calls: Vec<ExpectedCallDefinition> = serde_json::from_value(raw.clone())
        .map_err(|e| invalid(def, format!("answer_key is not a list of calls: {e}")))?;
    if calls.is_empty() {
        return Err(invalid(def, "answer_key lists no expected calls"));
    }
    Ok(GroundTruth::SideEffect(SideEffectAnswer::from_definitions(&calls)?))
}

fn information_truth(
    declared_type: Option<AnswerType>,
    def: &InstanceDefinition,
) -> Result<GroundTruth> {
    let raw = def
        .answer_key
        .as_ref()
        .ok_or_else(|| EvalError::MissingReferenceAnswer { instance_id: def.id.clone() })?;
    let Some((label, value)) = raw.as_object().and_then(|obj| obj.iter().next()) else {
        return Err(invalid(def, "answer_key must be an object keyed by answer format"));
    };
    let answer_type = declared_type
        .or_else(|| AnswerType::from_label(label))
        .ok_or_else(|| invalid(def, format!("unknown answer format '{label}'")))?;
    let reference = ReferenceAnswer::parse(answer_type, value).map_err(|e| invalid(def, e))?;
    Ok(GroundTruth::InformationSeeking(InformationSeekingAnswer { answer_type, reference }))
}
