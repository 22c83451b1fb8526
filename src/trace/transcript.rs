//! Agent transcripts (`interact_messages.json`).

use serde::Serialize;
use serde_json::Value;

use super::event::malformed;
use crate::error::Result;

/// Role of agent-authored messages.
pub const AGENT_ROLE: &str = "assistant";

/// The agent's final response for one instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservedOutput {
    /// Instance the transcript belongs to.
    pub instance_id: String,
    /// Text of the last message.
    pub text: String,
    /// `false` when the last message was not written by the agent.
    pub well_formed: bool,
}

impl ObservedOutput {
    /// Takes the last message of a role-tagged transcript as the agent's output.
    ///
    /// A transcript whose last message is not agent-authored is still used, but
    /// flagged as not well formed.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MalformedTrace`](crate::error::EvalError::MalformedTrace)
    /// if the transcript is empty.
    pub fn from_messages(instance_id: &str, messages: &[Value]) -> Result<Self> {
        let last = messages.last().ok_or_else(|| malformed(0, "transcript has no messages"))?;
        let role = last.get("role").and_then(Value::as_str).unwrap_or_default();
        Ok(Self {
            instance_id: instance_id.to_string(),
            text: content_text(last.get("content")),
            well_formed: role == AGENT_ROLE,
        })
    }
}

/// Flattens message content, which is either a string or a list of text parts.
fn content_text(content: Option<&Value>) -> String {
    match content {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(text) => Some(text.as_str()),
                other => other.get("text").and_then(Value::as_str),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}
