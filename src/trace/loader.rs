//! Discovers agent artifacts on disk and attributes them to task instances.
//!
//! An artifact belongs to the instance whose id appears in its path relative
//! to the scanned directory. Artifacts that match no instance are skipped.
//! An attributed artifact that fails to parse is recorded as a failure of its
//! instance and the rest of the run continues.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::artifacts::Artifacts;
use super::event::NetworkEvent;
use super::transcript::ObservedOutput;
use super::{browser, event_log};
use crate::context::ServiceContext;
use crate::error::{EvalError, Result};
use crate::ports::artifacts::ArtifactEntry;
use crate::task::TaskRegistry;

/// Transcript file expected inside each run directory.
pub const TRANSCRIPT_FILE: &str = "interact_messages.json";

/// Raw capture format of a network trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    /// Browser-automation network capture (WebVoyager).
    BrowserCapture,
    /// Execution event log (OdoBotNL).
    EventLog,
}

/// Loads traces and transcripts for the instances in a registry.
pub struct ArtifactLoader<'a> {
    ctx: &'a ServiceContext,
    registry: &'a TaskRegistry,
}

impl<'a> ArtifactLoader<'a> {
    /// Creates a loader reading through `ctx` and attributing to `registry`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, registry: &'a TaskRegistry) -> Self {
        Self { ctx, registry }
    }

    /// Loads every trace file under `dir` into `artifacts`.
    ///
    /// Browser captures are the `*.json` files directly in `dir`; event logs
    /// may also sit one directory down. Returns the number of files loaded.
    ///
    /// # Errors
    ///
    /// Returns an error only if `dir` cannot be listed.
    pub fn load_network_logs(
        &self,
        dir: &Path,
        format: TraceFormat,
        artifacts: &mut Artifacts,
    ) -> Result<usize> {
        let mut candidates = Vec::new();
        for entry in self.list(dir)? {
            if entry.is_dir {
                if format == TraceFormat::EventLog {
                    candidates.extend(self.list(&entry.path)?.into_iter().filter(is_json_file));
                }
            } else if is_json_file(&entry) {
                candidates.push(entry);
            }
        }

        let mut loaded = 0;
        for entry in candidates {
            let relative = relative_name(dir, &entry.path);
            let Some(instance_id) = self.registry.instance_in_path(&relative) else {
                warn!(path = %entry.path.display(), "trace does not contain any task instance id");
                continue;
            };
            match self.read_trace(&entry.path, format) {
                Ok(events) => {
                    info!(
                        instance_id,
                        events = events.len(),
                        path = %entry.path.display(),
                        "loaded network events"
                    );
                    artifacts.register_events(instance_id, events);
                    loaded += 1;
                }
                Err(e) => {
                    error!(instance_id, path = %entry.path.display(), error = %e, "unusable trace");
                    artifacts.register_failure(instance_id, e);
                }
            }
        }
        Ok(loaded)
    }

    /// Reads and normalizes one trace file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not JSON, or fails normalization.
    pub fn read_trace(&self, path: &Path, format: TraceFormat) -> Result<Vec<NetworkEvent>> {
        let document = self.read_json(path)?;
        match format {
            TraceFormat::BrowserCapture => {
                let records = document.as_array().ok_or_else(|| EvalError::MalformedTrace {
                    index: 0,
                    reason: "network log is not a JSON array".to_string(),
                })?;
                browser::normalize(records)
            }
            TraceFormat::EventLog => event_log::normalize(&document),
        }
    }

    /// Loads the final agent message from each run directory under `dir`.
    ///
    /// Returns the number of transcripts loaded.
    ///
    /// # Errors
    ///
    /// Returns an error only if `dir` cannot be listed.
    pub fn load_transcripts(&self, dir: &Path, artifacts: &mut Artifacts) -> Result<usize> {
        let mut loaded = 0;
        for entry in self.list(dir)?.into_iter().filter(|e| e.is_dir) {
            let name = entry.name();
            let Some(instance_id) = self.registry.instance_in_path(&name) else {
                debug!(dir = %name, "run directory does not contain any task instance id");
                continue;
            };
            let path = entry.path.join(TRANSCRIPT_FILE);
            if !self.ctx.store.is_file(&path) {
                warn!(instance_id, dir = %entry.path.display(), "run directory has no {TRANSCRIPT_FILE}");
                continue;
            }
            match self.read_transcript(&path, instance_id) {
                Ok(output) => {
                    if !output.well_formed {
                        warn!(
                            instance_id,
                            "invalid transcript: last entry should have role 'assistant'"
                        );
                    }
                    artifacts.register_output(output);
                    loaded += 1;
                }
                Err(e) => {
                    error!(instance_id, path = %path.display(), error = %e, "unusable transcript");
                    artifacts.register_failure(instance_id, e);
                }
            }
        }
        Ok(loaded)
    }

    fn read_transcript(&self, path: &Path, instance_id: &str) -> Result<ObservedOutput> {
        let document = self.read_json(path)?;
        let messages = document.as_array().ok_or_else(|| EvalError::MalformedTrace {
            index: 0,
            reason: "transcript is not a JSON array".to_string(),
        })?;
        ObservedOutput::from_messages(instance_id, messages)
    }

    fn read_json(&self, path: &Path) -> Result<Value> {
        let text = self.ctx.store.read_to_string(path).map_err(|e| io_error(path, &e))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn list(&self, dir: &Path) -> Result<Vec<ArtifactEntry>> {
        self.ctx.store.list_dir(dir).map_err(|e| io_error(dir, &e))
    }
}

fn io_error(path: &Path, err: &dyn std::fmt::Display) -> EvalError {
    EvalError::Io { path: path.display().to_string(), reason: err.to_string() }
}

fn is_json_file(entry: &ArtifactEntry) -> bool {
    !entry.is_dir && entry.path.extension().is_some_and(|ext| ext == "json")
}

fn relative_name(dir: &Path, path: &Path) -> String {
    path.strip_prefix(dir).unwrap_or(path).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemArtifacts;
    use serde_json::json;

    fn registry() -> TaskRegistry {
        let json = json!([
            {"id": "page", "type": "Side-effect", "instances": [
                {"id": "inst-1", "answer_key": [{"method": "POST", "path": "/courses/5/pages"}]},
                {"id": "inst-12", "answer_key": [{"method": "POST", "path": "/courses/6/pages"}]}
            ]},
            {"id": "due", "type": "Information Seeking", "answer_type": "Numeric", "instances": [
                {"id": "inst-2", "answer_key": {"Numeric": 3}}
            ]}
        ]);
        TaskRegistry::from_json(&json.to_string()).unwrap().0
    }

    fn capture(url: &str) -> String {
        json!([{"params": {"request": {
            "method": "POST",
            "url": url,
            "headers": {"Content-Type": "application/json"},
            "postData": "{\"title\": \"Syllabus\"}"
        }}}])
        .to_string()
    }

    #[test]
    fn loads_browser_captures_by_instance_id() {
        let ctx = ServiceContext::with_store(
            MemArtifacts::new()
                .with_file("/wv/network_inst-12.json", capture("http://h/courses/6/pages"))
                .with_file("/wv/network_inst-1.json", capture("http://h/courses/5/pages"))
                .with_file("/wv/network_other.json", capture("http://h/x"))
                .with_file("/wv/notes.txt", "ignored"),
        );
        let registry = registry();
        let loader = ArtifactLoader::new(&ctx, &registry);
        let mut artifacts = Artifacts::new();

        let loaded = loader
            .load_network_logs(Path::new("/wv"), TraceFormat::BrowserCapture, &mut artifacts)
            .unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(artifacts.events("inst-1").unwrap()[0].path, "/courses/5/pages");
        assert_eq!(artifacts.events("inst-12").unwrap()[0].path, "/courses/6/pages");
    }

    #[test]
    fn bad_trace_is_recorded_against_its_instance() {
        let bad = json!([{"params": {"request": {
            "method": "POST",
            "url": "http://h/upload",
            "headers": {"Content-Type": "multipart/form-data"},
            "postData": "--x"
        }}}]);
        let ctx = ServiceContext::with_store(
            MemArtifacts::new()
                .with_file("/wv/inst-1.json", bad.to_string())
                .with_file("/wv/inst-12.json", capture("http://h/courses/6/pages")),
        );
        let registry = registry();
        let mut artifacts = Artifacts::new();
        let loaded = ArtifactLoader::new(&ctx, &registry)
            .load_network_logs(Path::new("/wv"), TraceFormat::BrowserCapture, &mut artifacts)
            .unwrap();
        assert_eq!(loaded, 1);
        assert!(artifacts.events("inst-1").is_none());
        assert!(matches!(
            artifacts.failure("inst-1"),
            Some(EvalError::UnsupportedContentType { .. })
        ));
        assert!(artifacts.failure("inst-12").is_none());
    }

    #[test]
    fn loads_event_logs_from_subdirectories() {
        let log = json!({"events": [
            {"eventType": "NETWORK_EVENT", "eventDetails": {
                "method": "POST", "url": "http://h/courses/5/pages", "requestBody": "{\"title\": \"Syllabus\"}"
            }}
        ]});
        let ctx = ServiceContext::with_store(
            MemArtifacts::new().with_file("/odo/run_inst-1/events.json", log.to_string()),
        );
        let registry = registry();
        let mut artifacts = Artifacts::new();
        let loaded = ArtifactLoader::new(&ctx, &registry)
            .load_network_logs(Path::new("/odo"), TraceFormat::EventLog, &mut artifacts)
            .unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(artifacts.events("inst-1").unwrap()[0].body["title"], json!("Syllabus"));
    }

    #[test]
    fn loads_transcripts_from_run_directories() {
        let transcript = json!([
            {"role": "user", "content": "How many modules?"},
            {"role": "assistant", "content": "Answer: 3"}
        ]);
        let ctx = ServiceContext::with_store(
            MemArtifacts::new()
                .with_file("/results/task_inst-2/interact_messages.json", transcript.to_string())
                .with_file("/results/task_unknown/interact_messages.json", "[]")
                .with_file("/results/task_inst-1/screenshot0.png", ""),
        );
        let registry = registry();
        let mut artifacts = Artifacts::new();
        let loaded = ArtifactLoader::new(&ctx, &registry)
            .load_transcripts(Path::new("/results"), &mut artifacts)
            .unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(artifacts.output("inst-2").unwrap().text, "Answer: 3");
        assert!(artifacts.output("inst-1").is_none());
    }

    #[test]
    fn unreadable_directory_is_an_error() {
        let ctx = ServiceContext::with_store(MemArtifacts::new());
        let registry = registry();
        let mut artifacts = Artifacts::new();
        let result = ArtifactLoader::new(&ctx, &registry).load_network_logs(
            Path::new("/missing"),
            TraceFormat::BrowserCapture,
            &mut artifacts,
        );
        assert!(matches!(result, Err(EvalError::Io { .. })));
    }
}
