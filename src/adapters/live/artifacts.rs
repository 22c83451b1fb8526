//! Disk-backed artifact store using `std::fs`.

use std::path::Path;

use crate::ports::artifacts::{ArtifactEntry, ArtifactStore, StoreError};

/// Artifact store backed by the local filesystem.
pub struct DiskArtifacts;

impl ArtifactStore for DiskArtifacts {
    fn read_to_string(&self, path: &Path) -> Result<String, StoreError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<ArtifactEntry>, StoreError> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            entries.push(ArtifactEntry { path: entry.path(), is_dir: entry.file_type()?.is_dir() });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}
