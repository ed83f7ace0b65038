//! Manifest file writing
//!
//! This module provides:
//! - ManifestWriter for persisting the metapackage
//! - Dry-run mode support (no actual file modifications)
//! - Skipping the write when the content is unchanged

use crate::error::ManifestError;
use crate::manifest::ComposerManifest;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writer for the metapackage manifest
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

/// Result of writing the manifest
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Number of conflict entries in the written manifest
    pub conflicts: usize,
    /// Whether the file was actually modified
    pub file_modified: bool,
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Create a ManifestWriter in dry-run mode
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Check if this writer is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Write the manifest to `path`, creating parent directories
    pub fn write(
        &self,
        manifest: &ComposerManifest,
        path: &Path,
    ) -> Result<WriteResult, ManifestError> {
        let content = manifest
            .to_json_string()
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

        let mut result = WriteResult {
            path: path.to_path_buf(),
            conflicts: manifest.conflict_count(),
            file_modified: false,
        };

        if self.dry_run {
            debug!(path = %path.display(), "dry run, not writing manifest");
            return Ok(result);
        }

        if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
            debug!(path = %path.display(), "manifest unchanged");
            return Ok(result);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ManifestError::write_error(parent, e))?;
        }
        fs::write(path, &content).map_err(|e| ManifestError::write_error(path, e))?;
        info!(path = %path.display(), conflicts = result.conflicts, "wrote manifest");

        result.file_modified = true;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manifest() -> ComposerManifest {
        let mut manifest = ComposerManifest::default();
        manifest.set_conflict("views", "<1.0.0");
        manifest
    }

    #[test]
    fn test_writer_creation() {
        assert!(!ManifestWriter::new(false).is_dry_run());
        assert!(ManifestWriter::dry_run().is_dry_run());
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build").join("composer-9.x.json");

        let result = ManifestWriter::new(false).write(&manifest(), &path).unwrap();
        assert!(result.file_modified);
        assert_eq!(result.conflicts, 1);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"drupal/views\": \"<1.0.0\""));
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("composer-9.x.json");

        let result = ManifestWriter::dry_run().write(&manifest(), &path).unwrap();
        assert!(!result.file_modified);
        assert!(!path.exists());
    }

    #[test]
    fn test_unchanged_content_is_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("composer-9.x.json");
        let writer = ManifestWriter::new(false);

        assert!(writer.write(&manifest(), &path).unwrap().file_modified);
        assert!(!writer.write(&manifest(), &path).unwrap().file_modified);
    }

    #[test]
    fn test_written_file_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("composer-9.x.json");
        ManifestWriter::new(false).write(&manifest(), &path).unwrap();

        let loaded = ComposerManifest::load(&path).unwrap();
        assert_eq!(loaded.conflict("drupal/views"), Some("<1.0.0"));
    }
}
