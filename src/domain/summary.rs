//! Build summary types
//!
//! Provides the overall record of one metapackage build.

use super::{PackageResult, ReleaseCategory};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Overall summary of a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSummary {
    /// Release category that was built
    pub category: ReleaseCategory,
    /// Manifest that was (or would have been) written
    pub manifest_path: PathBuf,
    /// Results per project, sorted by project name
    pub packages: Vec<PackageResult>,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Whether the manifest file was actually modified
    pub modified: bool,
}

impl BuildSummary {
    /// Creates an empty summary
    pub fn new(category: ReleaseCategory, manifest_path: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            category,
            manifest_path: manifest_path.into(),
            packages: Vec::new(),
            dry_run,
            modified: false,
        }
    }

    /// Adds a package result
    pub fn add_package(&mut self, result: PackageResult) {
        self.packages.push(result);
    }

    /// Sorts package results by project name
    pub fn sort(&mut self) {
        self.packages.sort_by(|a, b| a.project.cmp(&b.project));
    }

    /// Returns the total number of projects processed
    pub fn total_packages(&self) -> usize {
        self.packages.len()
    }

    pub fn generated_count(&self) -> usize {
        self.generated().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.packages
            .iter()
            .filter(|p| !p.is_generated() && !p.is_failed())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    /// Returns all projects with a derived constraint
    pub fn generated(&self) -> impl Iterator<Item = &PackageResult> {
        self.packages.iter().filter(|p| p.is_generated())
    }

    /// Returns all projects that failed
    pub fn failed(&self) -> impl Iterator<Item = &PackageResult> {
        self.packages.iter().filter(|p| p.is_failed())
    }

    /// Returns true if any project failed
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> BuildSummary {
        let mut summary = BuildSummary::new(ReleaseCategory::Current, "build/composer-9.x.json", false);
        summary.add_package(PackageResult::generated("views", "<1.0.0"));
        summary.add_package(PackageResult::no_constraint("token"));
        summary.add_package(PackageResult::failed("ctools", "timeout"));
        summary.add_package(PackageResult::generated("admin_toolbar", "*"));
        summary
    }

    #[test]
    fn test_new_summary() {
        let summary = BuildSummary::new(ReleaseCategory::Legacy, "build/composer-7.x.json", true);
        assert!(summary.packages.is_empty());
        assert!(summary.dry_run);
        assert!(!summary.modified);
        assert!(!summary.has_failures());
    }

    #[test]
    fn test_counts() {
        let summary = summary();
        assert_eq!(summary.total_packages(), 4);
        assert_eq!(summary.generated_count(), 2);
        assert_eq!(summary.skipped_count(), 1);
        assert_eq!(summary.failed_count(), 1);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_sort() {
        let mut summary = summary();
        summary.sort();
        let names: Vec<&str> = summary.packages.iter().map(|p| p.project.as_str()).collect();
        assert_eq!(names, vec!["admin_toolbar", "ctools", "token", "views"]);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&summary()).unwrap();
        assert!(json.contains("\"category\":\"current\""));
        assert!(json.contains("\"type\":\"failed\""));

        let parsed: BuildSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary());
    }
}
