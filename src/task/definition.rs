//! Raw task definitions as produced by the task-generation pipeline.
//!
//! These mirror `tasks.json` field-for-field. They are resolved into the typed
//! model by [`TaskRegistry`](super::TaskRegistry) and also feed the executor
//! task-list exporters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A task entry in `tasks.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Unique task identifier.
    pub id: String,
    /// Category label: `"Side-effect"` or `"Information Seeking"`.
    #[serde(rename = "type")]
    pub category: String,
    /// Answer format label for Information Seeking tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_type: Option<String>,
    /// Task text with parameter placeholders.
    #[serde(default)]
    pub parameterized_text: String,
    /// Parameter definitions.
    #[serde(default)]
    pub parameters: Value,
    /// Concrete instances of this task.
    #[serde(default)]
    pub instances: Vec<InstanceDefinition>,
}

/// A task instance entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceDefinition {
    /// Unique instance identifier; also embedded in artifact paths.
    pub id: String,
    /// Task text with parameters substituted.
    #[serde(default)]
    pub instance_text: String,
    /// Parameter values used for this instance.
    #[serde(default)]
    pub mapping: Value,
    /// Login name for executors that use per-instance accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_username: Option<String>,
    /// Password for executors that use per-instance accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_password: Option<String>,
    /// Ground truth; its shape depends on the task category.
    #[serde(default)]
    pub answer_key: Option<Value>,
}

/// One expected call inside a Side-effect `answer_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedCallDefinition {
    /// HTTP method.
    pub method: String,
    /// Path, optionally with a query string or `[[ANY]]` tokens.
    pub path: String,
    /// Expected request-body values.
    #[serde(default)]
    pub request_kv: Option<Map<String, Value>>,
    /// Grouping tag for alternative answer options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_task_with_defaults() {
        let def: TaskDefinition = serde_json::from_value(json!({
            "id": "t1",
            "type": "Side-effect",
            "instances": [{"id": "t1-i1", "answer_key": []}]
        }))
        .unwrap();
        assert_eq!(def.category, "Side-effect");
        assert!(def.answer_type.is_none());
        assert_eq!(def.instances[0].instance_text, "");
        assert_eq!(def.instances[0].answer_key, Some(json!([])));
    }

    #[test]
    fn null_answer_key_is_absent() {
        let def: InstanceDefinition =
            serde_json::from_value(json!({"id": "i", "answer_key": null})).unwrap();
        assert!(def.answer_key.is_none());
    }
}
