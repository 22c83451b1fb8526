//! Trace normalization.
//!
//! Two capture formats converge on one canonical [`NetworkEvent`]:
//! browser network captures ([`browser`]) and execution event logs
//! ([`event_log`]). Agent transcripts are reduced to an [`ObservedOutput`].

pub mod browser;
pub mod event_log;

mod artifacts;
mod event;
mod loader;
mod transcript;

pub use artifacts::Artifacts;
pub use event::{form_body, json_body, kind_of, NetworkEvent};
pub use loader::{ArtifactLoader, TraceFormat, TRANSCRIPT_FILE};
pub use transcript::{ObservedOutput, AGENT_ROLE};
