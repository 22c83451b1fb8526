//! Per-instance collection of loaded agent artifacts.

use std::collections::BTreeMap;

use tracing::warn;

use super::event::NetworkEvent;
use super::transcript::ObservedOutput;
use crate::error::EvalError;

/// Network events, final outputs and load failures, keyed by task instance id.
#[derive(Debug, Default)]
pub struct Artifacts {
    events: BTreeMap<String, Vec<NetworkEvent>>,
    outputs: BTreeMap<String, ObservedOutput>,
    failures: BTreeMap<String, EvalError>,
}

impl Artifacts {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds events for an instance, after any already registered.
    pub fn register_events(&mut self, instance_id: &str, events: Vec<NetworkEvent>) {
        self.events.entry(instance_id.to_string()).or_default().extend(events);
    }

    /// Registers an instance's final output, replacing any earlier one.
    pub fn register_output(&mut self, output: ObservedOutput) {
        if let Some(previous) = self.outputs.insert(output.instance_id.clone(), output) {
            warn!(instance_id = %previous.instance_id, "replaced previously loaded transcript");
        }
    }

    /// Records that an artifact attributed to an instance could not be loaded.
    ///
    /// The first failure is kept; grading the instance reports it as an error.
    pub fn register_failure(&mut self, instance_id: &str, error: EvalError) {
        self.failures.entry(instance_id.to_string()).or_insert(error);
    }

    /// Load failure recorded for an instance.
    #[must_use]
    pub fn failure(&self, instance_id: &str) -> Option<&EvalError> {
        self.failures.get(instance_id)
    }

    /// Events registered for an instance, if any trace was loaded for it.
    #[must_use]
    pub fn events(&self, instance_id: &str) -> Option<&[NetworkEvent]> {
        self.events.get(instance_id).map(Vec::as_slice)
    }

    /// Final output registered for an instance.
    #[must_use]
    pub fn output(&self, instance_id: &str) -> Option<&ObservedOutput> {
        self.outputs.get(instance_id)
    }

    /// Number of instances with at least one loaded trace.
    #[must_use]
    pub fn network_log_count(&self) -> usize {
        self.events.len()
    }

    /// Number of instances with a loaded transcript.
    #[must_use]
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }
}
