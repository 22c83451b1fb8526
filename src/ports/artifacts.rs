//! Artifact store port for reading run artifacts and writing reports.

use std::path::{Path, PathBuf};

/// Error type returned by artifact store operations.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// A directory entry returned by [`ArtifactStore::list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

impl ArtifactEntry {
    /// File or directory name of the entry.
    #[must_use]
    pub fn name(&self) -> String {
        self.path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
    }
}

/// Access to task definitions, agent traces, transcripts, and report output.
///
/// Abstracting storage lets the loaders run against an in-memory tree in tests.
pub trait ArtifactStore: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, StoreError>;

    /// Writes the given contents to a file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError>;

    /// Returns `true` if `path` is an existing file.
    fn is_file(&self, path: &Path) -> bool;

    /// Lists the entries of a directory, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a readable directory.
    fn list_dir(&self, path: &Path) -> Result<Vec<ArtifactEntry>, StoreError>;
}
