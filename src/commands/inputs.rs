//! Loading of task definitions and artifacts shared by the commands.

use std::path::Path;

use tracing::{info, warn};

use crate::cli::InputArgs;
use crate::context::ServiceContext;
use crate::task::{load_definitions, LoadIssue, TaskDefinition, TaskRegistry};
use crate::trace::{ArtifactLoader, Artifacts, TraceFormat};

/// Reads a file through the context's store.
pub(crate) fn read(ctx: &ServiceContext, path: &Path) -> Result<String, String> {
    ctx.store.read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))
}

/// Loads `tasks.json` into a registry. Skipped tasks are returned, not fatal.
pub(crate) fn load_registry(
    ctx: &ServiceContext,
    path: &Path,
) -> Result<(TaskRegistry, Vec<LoadIssue>), String> {
    info!(path = %path.display(), "loading task definitions");
    let json = read(ctx, path)?;
    TaskRegistry::from_json(&json)
        .map_err(|e| format!("Invalid task definitions in {}: {e}", path.display()))
}

/// Loads raw task definitions for export.
pub(crate) fn load_task_definitions(
    ctx: &ServiceContext,
    path: &Path,
) -> Result<Vec<TaskDefinition>, String> {
    let json = read(ctx, path)?;
    let (definitions, issues) = load_definitions(&json)
        .map_err(|e| format!("Invalid task definitions in {}: {e}", path.display()))?;
    for issue in &issues {
        warn!(%issue, "skipped while loading task definitions");
    }
    Ok(definitions)
}

/// Loads every artifact directory named on the command line.
pub(crate) fn load_artifacts(
    ctx: &ServiceContext,
    registry: &TaskRegistry,
    inputs: &InputArgs,
) -> Result<Artifacts, String> {
    let loader = ArtifactLoader::new(ctx, registry);
    let mut artifacts = Artifacts::new();

    let logs = [
        (&inputs.wv_network_logs, TraceFormat::BrowserCapture),
        (&inputs.event_logs, TraceFormat::EventLog),
    ];
    for (dir, format) in logs {
        if let Some(dir) = dir {
            info!(dir = %dir.display(), ?format, "looking for network logs");
            loader.load_network_logs(dir, format, &mut artifacts).map_err(|e| e.to_string())?;
        }
    }
    if let Some(dir) = &inputs.wv_interact_messages {
        info!(dir = %dir.display(), "looking for interaction messages");
        loader.load_transcripts(dir, &mut artifacts).map_err(|e| e.to_string())?;
    }
    Ok(artifacts)
}

/// Writes `contents` to `output`, or prints it when no file is given.
pub(crate) fn emit(ctx: &ServiceContext, output: Option<&Path>, contents: &str) -> Result<(), String> {
    match output {
        Some(path) => {
            ctx.store
                .write(path, contents)
                .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
            info!(path = %path.display(), "wrote output");
            Ok(())
        }
        None => {
            print!("{contents}");
            if !contents.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemArtifacts;
    use serde_json::json;
    use std::path::PathBuf;

    fn tasks_json() -> String {
        json!([
            {"id": "page", "type": "Side-effect", "instances": [
                {"id": "page-1", "answer_key": [{"method": "POST", "path": "/courses/5/pages"}]}
            ]},
            {"id": "broken", "type": "Quiz", "instances": []}
        ])
        .to_string()
    }

    #[test]
    fn registry_skips_bad_tasks() {
        let ctx = ServiceContext::with_store(MemArtifacts::new().with_file("/tasks.json", tasks_json()));
        let (registry, issues) = load_registry(&ctx, Path::new("/tasks.json")).unwrap();
        assert_eq!(registry.tasks().len(), 1);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].task_id.as_deref(), Some("broken"));
    }

    #[test]
    fn missing_tasks_file_is_an_error() {
        let ctx = ServiceContext::with_store(MemArtifacts::new());
        let err = load_registry(&ctx, Path::new("/nope.json")).unwrap_err();
        assert!(err.contains("/nope.json"));
    }

    #[test]
    fn loads_only_named_directories() {
        let capture = json!([{"params": {"request": {
            "method": "POST",
            "url": "http://localhost:8088/courses/5/pages",
            "headers": {"content-type": "application/x-www-form-urlencoded"},
            "postData": "title=Syllabus"
        }}}]);
        let ctx = ServiceContext::with_store(
            MemArtifacts::new()
                .with_file("/tasks.json", tasks_json())
                .with_file("/wv/page-1.json", capture.to_string()),
        );
        let (registry, _) = load_registry(&ctx, Path::new("/tasks.json")).unwrap();
        let inputs = InputArgs {
            tasks: PathBuf::from("/tasks.json"),
            wv_network_logs: Some(PathBuf::from("/wv")),
            wv_interact_messages: None,
            event_logs: None,
        };
        let artifacts = load_artifacts(&ctx, &registry, &inputs).unwrap();
        assert_eq!(artifacts.network_log_count(), 1);
        assert_eq!(artifacts.output_count(), 0);
    }

    #[test]
    fn emit_writes_to_store() {
        let ctx = ServiceContext::with_store(MemArtifacts::new());
        emit(&ctx, Some(Path::new("/out/report.yaml")), "correct: 1\n").unwrap();
        assert_eq!(ctx.store.read_to_string(Path::new("/out/report.yaml")).unwrap(), "correct: 1\n");
    }
}
