//! In-memory artifact store for tests and dry runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::ports::artifacts::{ArtifactEntry, ArtifactStore, StoreError};

/// Artifact store holding files in a map keyed by path.
///
/// Directories exist implicitly as ancestors of stored files.
#[derive(Debug, Default)]
pub struct MemArtifacts {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemArtifacts {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, builder style.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), contents.into());
        }
        self
    }
}

impl ArtifactStore for MemArtifacts {
    fn read_to_string(&self, path: &Path) -> Result<String, StoreError> {
        let files = self.files.lock().map_err(|e| e.to_string())?;
        files.get(path).cloned().ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        let mut files = self.files.lock().map_err(|e| e.to_string())?;
        files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().map(|files| files.contains_key(path)).unwrap_or(false)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<ArtifactEntry>, StoreError> {
        let files = self.files.lock().map_err(|e| e.to_string())?;
        let mut entries: BTreeMap<PathBuf, bool> = BTreeMap::new();
        for file in files.keys() {
            let Ok(rest) = file.strip_prefix(path) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            let is_dir = components.next().is_some();
            *entries.entry(path.join(first)).or_default() |= is_dir;
        }
        if entries.is_empty() {
            return Err(format!("Not a directory: {}", path.display()).into());
        }
        Ok(entries.into_iter().map(|(path, is_dir)| ArtifactEntry { path, is_dir }).collect())
    }
}
