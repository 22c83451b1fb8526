//! Error types for task loading, trace normalization, and evaluation.

use thiserror::Error;

/// Errors that abort loading a task, normalizing a trace, or evaluating an instance.
///
/// Expected negative outcomes (a failed match, a wrong answer) are never
/// errors; they are carried in evaluation results instead.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A task definition declared a category other than Side-effect or Information Seeking.
    #[error("unknown category '{category}' for task {task_id}")]
    UnknownCategory { task_id: String, category: String },

    /// A task declared an `answer_type` that names no known answer type.
    #[error("unknown answer type '{label}' for task {task_id}")]
    UnknownAnswerType { task_id: String, label: String },

    /// An instance refers to a task that is not in the registry.
    #[error("no task registered for instance {instance_id}")]
    UnknownTask { instance_id: String },

    /// An Information Seeking instance has no `answer_key`.
    #[error("instance {instance_id} has no reference answer")]
    MissingReferenceAnswer { instance_id: String },

    /// A ground-truth definition could not be interpreted.
    #[error("invalid ground truth for instance {instance_id}: {reason}")]
    InvalidGroundTruth { instance_id: String, reason: String },

    /// A `[[...]]` token names no known dynamic operator.
    #[error("unknown dynamic operator '{token}'")]
    UnknownOperator { token: String },

    /// A wildcard path pattern did not compile.
    #[error("invalid path pattern '{pattern}': {source}")]
    InvalidPathPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A dynamic operator was applied to a value of the wrong shape.
    #[error("operator {operator} on key '{key}' needs {expected}, found {found}")]
    OperatorShape {
        operator: &'static str,
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An operator operand could not be coerced to the observed element type.
    #[error("operator {operator} operand '{operand}' is not an integer")]
    OperandCoercion { operator: &'static str, operand: String },

    /// A captured request body used a content type the normalizer cannot decode.
    #[error("unsupported content type '{content_type}' for request to {url}")]
    UnsupportedContentType { content_type: String, url: String },

    /// A captured request body could not be decoded into a mapping.
    #[error("malformed request body for {url}: {reason}")]
    MalformedBody { url: String, reason: String },

    /// A trace record is missing required fields.
    #[error("malformed trace record {index}: {reason}")]
    MalformedTrace { index: usize, reason: String },

    /// A timezone identifier is not a known IANA zone.
    #[error("unknown timezone '{name}'")]
    InvalidTimezone { name: String },

    /// Reading or writing an artifact failed.
    #[error("i/o error on {path}: {reason}")]
    Io { path: String, reason: String },

    /// JSON decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, EvalError>;
