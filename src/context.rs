//! Service context bundling the external boundaries of a run.

use crate::adapters::live::artifacts::DiskArtifacts;
use crate::ports::artifacts::ArtifactStore;

/// Bundles port trait objects into a single context.
///
/// Loaders and commands take the context instead of touching the disk
/// directly, so tests can substitute an in-memory store.
pub struct ServiceContext {
    /// Storage for task definitions, traces, transcripts, and reports.
    pub store: Box<dyn ArtifactStore>,
}

impl ServiceContext {
    /// Creates a live context reading and writing the local filesystem.
    #[must_use]
    pub fn live() -> Self {
        Self { store: Box::new(DiskArtifacts) }
    }

    /// Creates a context around the given store.
    #[must_use]
    pub fn with_store(store: impl ArtifactStore + 'static) -> Self {
        Self { store: Box::new(store) }
    }
}
