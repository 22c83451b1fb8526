//! Registry of loaded tasks, indexed by instance id.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::answer::AnswerType;
use super::definition::TaskDefinition;
use super::instance::{Task, TaskCategory, TaskInstance};
use crate::error::{EvalError, Result};

/// A task or instance that was skipped while loading definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadIssue {
    /// Task the issue belongs to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Instance the issue belongs to, when it concerns a single instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    /// Why it was skipped.
    pub reason: String,
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.task_id, &self.instance_id) {
            (_, Some(instance)) => write!(f, "instance {instance}: {}", self.reason),
            (Some(task), None) => write!(f, "task {task}: {}", self.reason),
            (None, None) => f.write_str(&self.reason),
        }
    }
}

/// Parses `tasks.json` into raw definitions, skipping entries that do not deserialize.
///
/// # Errors
///
/// Returns an error if the document is not a JSON array.
pub fn load_definitions(json: &str) -> Result<(Vec<TaskDefinition>, Vec<LoadIssue>)> {
    let entries: Vec<Value> = serde_json::from_str(json)?;
    let mut definitions = Vec::with_capacity(entries.len());
    let mut issues = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let task_id = entry.get("id").and_then(Value::as_str).map(String::from);
        match serde_json::from_value::<TaskDefinition>(entry) {
            Ok(def) => definitions.push(def),
            Err(e) => issues.push(LoadIssue {
                task_id,
                instance_id: None,
                reason: format!("task entry {index} is malformed: {e}"),
            }),
        }
    }
    Ok((definitions, issues))
}

/// All known tasks, with an index from instance id to its task and position.
///
/// Built once at startup and then shared read-only by loaders and the evaluator.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
    index: HashMap<String, (usize, usize)>,
}

impl TaskRegistry {
    /// Loads a registry from the text of a `tasks.json` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a JSON array. Individual bad
    /// tasks and instances are reported as [`LoadIssue`]s instead.
    pub fn from_json(json: &str) -> Result<(Self, Vec<LoadIssue>)> {
        let (definitions, mut issues) = load_definitions(json)?;
        let (registry, more) = Self::from_definitions(&definitions);
        issues.extend(more);
        Ok((registry, issues))
    }

    /// Builds a registry from raw definitions.
    ///
    /// Tasks with an unknown category or answer type, instances whose ground
    /// truth cannot be resolved, and duplicate instance ids are skipped and reported.
    #[must_use]
    pub fn from_definitions(definitions: &[TaskDefinition]) -> (Self, Vec<LoadIssue>) {
        let mut registry = Self::default();
        let mut issues = Vec::new();

        for def in definitions {
            let Some(category) = TaskCategory::from_label(&def.category) else {
                let err = EvalError::UnknownCategory {
                    task_id: def.id.clone(),
                    category: def.category.clone(),
                };
                issues.push(LoadIssue {
                    task_id: Some(def.id.clone()),
                    instance_id: None,
                    reason: err.to_string(),
                });
                continue;
            };
            let answer_type = match def.answer_type.as_deref() {
                None => None,
                Some(label) => {
                    let Some(answer_type) = AnswerType::from_label(label) else {
                        let err = EvalError::UnknownAnswerType {
                            task_id: def.id.clone(),
                            label: label.to_string(),
                        };
                        issues.push(LoadIssue {
                            task_id: Some(def.id.clone()),
                            instance_id: None,
                            reason: err.to_string(),
                        });
                        continue;
                    };
                    Some(answer_type)
                }
            };

            let task_index = registry.tasks.len();
            let mut instances = Vec::with_capacity(def.instances.len());
            for inst in &def.instances {
                if registry.index.contains_key(&inst.id) {
                    issues.push(LoadIssue {
                        task_id: Some(def.id.clone()),
                        instance_id: Some(inst.id.clone()),
                        reason: "duplicate instance id".to_string(),
                    });
                    continue;
                }
                match TaskInstance::from_definition(&def.id, category, answer_type, inst) {
                    Ok(instance) => {
                        registry.index.insert(instance.id.clone(), (task_index, instances.len()));
                        instances.push(instance);
                    }
                    Err(e) => issues.push(LoadIssue {
                        task_id: Some(def.id.clone()),
                        instance_id: Some(inst.id.clone()),
                        reason: e.to_string(),
                    }),
                }
            }

            registry.tasks.push(Task {
                id: def.id.clone(),
                category,
                answer_type,
                parameterized_text: def.parameterized_text.clone(),
                parameters: def.parameters.clone(),
                instances,
            });
        }

        for issue in &issues {
            warn!(%issue, "skipped while loading task definitions");
        }
        info!(
            tasks = registry.tasks.len(),
            instances = registry.index.len(),
            "task definitions loaded"
        );
        (registry, issues)
    }

    /// All loaded tasks in definition order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Looks up an instance by id.
    #[must_use]
    pub fn instance(&self, id: &str) -> Option<&TaskInstance> {
        self.index.get(id).map(|&(task, inst)| &self.tasks[task].instances[inst])
    }

    /// All instances in definition order.
    pub fn instances(&self) -> impl Iterator<Item = &TaskInstance> {
        self.tasks.iter().flat_map(|t| t.instances.iter())
    }

    /// Number of registered instances.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.index.len()
    }

    /// Finds the registered instance id embedded in an artifact path.
    ///
    /// When several ids occur in `path`, the longest one wins.
    #[must_use]
    pub fn instance_in_path(&self, path: &str) -> Option<&str> {
        self.index
            .keys()
            .filter(|id| path.contains(id.as_str()))
            .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
            .map(String::as_str)
    }
}
