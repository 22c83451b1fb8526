//! Live adapters backed by the local filesystem.

pub mod artifacts;
