//! Task lists for agent executors.
//!
//! WebVoyager reads one JSON object per line; OdoBotNL reads a single JSON
//! array. Each task text is prefixed with login instructions and, for
//! Information Seeking tasks, followed by the answer format the evaluator
//! expects.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::task::{AnswerType, InstanceDefinition, TaskCategory, TaskDefinition};

/// Canvas URL the executors start from.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8088";

const WEB_NAME: &str = "Canvas LMS";

/// Executor a task list is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    /// WebVoyager, JSON lines.
    WebVoyager,
    /// OdoBotNL, one JSON array.
    OdoBotNl,
}

/// Login used in the task prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Canvas login.
    pub username: String,
    /// Canvas password.
    pub password: String,
}

/// Settings shared by all exported tasks.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Start URL for the executor.
    pub base_url: String,
    /// Login used when an instance has no account of its own.
    pub credentials: Option<Credentials>,
}

/// One WebVoyager task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebVoyagerTask {
    /// Start URL.
    pub web: String,
    /// Display name of the site.
    pub web_name: String,
    /// Human-readable origin of the task.
    pub description: String,
    /// Instance id; also names the run's artifacts.
    pub id: String,
    /// Prompt given to the agent.
    pub ques: String,
}

/// One OdoBotNL task wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OdoBotNlEntry {
    /// The task itself.
    #[serde(rename = "odoBotNL")]
    pub odo_bot_nl: OdoBotNlTask,
}

/// An OdoBotNL task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OdoBotNlTask {
    /// Instance id.
    pub id: String,
    /// `"<task number>|OdoBotNL|<instance id>"`, task numbers counting from 1.
    #[serde(rename = "_evalId")]
    pub eval_id: String,
    /// Start URL.
    #[serde(rename = "userLocation")]
    pub user_location: String,
    /// Prompt given to the agent.
    pub task: String,
}

/// Builds the WebVoyager task list. Every instance uses the shared login.
#[must_use]
pub fn webvoyager_tasks(tasks: &[TaskDefinition], options: &ExportOptions) -> Vec<WebVoyagerTask> {
    let mut out = Vec::new();
    for task in tasks {
        let suffix = answer_suffix(task);
        for instance in &task.instances {
            out.push(WebVoyagerTask {
                web: options.base_url.clone(),
                web_name: WEB_NAME.to_string(),
                description: format!("Instance of task {}", task.id),
                id: instance.id.clone(),
                ques: prompt(options.credentials.as_ref(), &instance.instance_text, suffix),
            });
        }
    }
    out
}

/// Builds the OdoBotNL task list.
///
/// Instances log in with their own account, falling back to the shared
/// login. Information Seeking tasks are not exported.
#[must_use]
pub fn odobotnl_tasks(tasks: &[TaskDefinition], options: &ExportOptions) -> Vec<OdoBotNlEntry> {
    let mut out = Vec::new();
    for (index, task) in tasks.iter().enumerate() {
        if TaskCategory::from_label(&task.category) == Some(TaskCategory::InformationSeeking) {
            debug!(task_id = %task.id, "skipping information seeking task for OdoBotNL");
            continue;
        }
        for instance in &task.instances {
            let credentials = instance_credentials(instance).or_else(|| {
                warn!(instance_id = %instance.id, "instance has no account; using shared login");
                options.credentials.clone()
            });
            out.push(OdoBotNlEntry {
                odo_bot_nl: OdoBotNlTask {
                    id: instance.id.clone(),
                    eval_id: format!("{}|OdoBotNL|{}", index + 1, instance.id),
                    user_location: options.base_url.clone(),
                    task: prompt(credentials.as_ref(), &instance.instance_text, None),
                },
            });
        }
    }
    out
}

/// Renders the task list for `target` as the executor's file contents.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(target: ExportTarget, tasks: &[TaskDefinition], options: &ExportOptions) -> Result<String> {
    match target {
        ExportTarget::WebVoyager => {
            let mut out = String::new();
            for task in webvoyager_tasks(tasks, options) {
                out.push_str(&serde_json::to_string(&task)?);
                out.push('\n');
            }
            Ok(out)
        }
        ExportTarget::OdoBotNl => Ok(serde_json::to_string(&odobotnl_tasks(tasks, options))?),
    }
}

fn instance_credentials(instance: &InstanceDefinition) -> Option<Credentials> {
    match (&instance.instance_username, &instance.instance_password) {
        (Some(username), Some(password)) => {
            Some(Credentials { username: username.clone(), password: password.clone() })
        }
        _ => None,
    }
}

fn prompt(credentials: Option<&Credentials>, text: &str, suffix: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(c) = credentials {
        out.push_str(&format!(
            "Use the username: {} and password: {} to login to Canvas.\n",
            c.username, c.password
        ));
    }
    out.push_str(text);
    if let Some(suffix) = suffix {
        out.push_str("\nWrite your answer in the following format:\n\n");
        out.push_str(suffix);
    }
    out
}

/// Answer-format line for an Information Seeking task.
fn answer_suffix(task: &TaskDefinition) -> Option<&'static str> {
    if TaskCategory::from_label(&task.category) != Some(TaskCategory::InformationSeeking) {
        return None;
    }
    let label = task.answer_type.as_deref().unwrap_or_default();
    match AnswerType::from_label(label) {
        Some(AnswerType::DateTime) => Some("Answer: YYYY-MM-DD HH:mm"),
        Some(AnswerType::Numeric) => Some("Answer: [Number]"),
        Some(AnswerType::Text) => Some("Answer: '[Text]'"),
        None => {
            warn!(task_id = %task.id, answer_type = label, "unknown answer type; no answer format added");
            None
        }
    }
}
