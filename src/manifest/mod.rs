//! Metapackage manifest handling
//!
//! This module provides functionality to:
//! - Load an existing `composer-*.json` or start from the default document
//! - Merge derived conflict rules, including the core alias
//! - Write the manifest back in composer's formatting

mod composer_json;
mod writer;

pub use composer_json::{ComposerManifest, CORE_ALIAS, CORE_PACKAGE, PACKAGE_NAME, VENDOR};
pub use writer::{ManifestWriter, WriteResult};

use crate::domain::ReleaseCategory;
use std::path::{Path, PathBuf};

/// Location of the manifest for a category inside the build directory
pub fn manifest_path(build_dir: &Path, category: ReleaseCategory) -> PathBuf {
    build_dir.join(category.output_filename())
}
