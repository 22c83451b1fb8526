//! Port traits defining external boundaries.
//!
//! The only boundary the evaluator crosses is storage: task definitions,
//! agent artifacts, and reports. Implementations live in `src/adapters/`.

pub mod artifacts;

pub use artifacts::{ArtifactEntry, ArtifactStore, StoreError};
