//! Core domain models
//!
//! This module contains the value types the constraint derivation works on:
//! - Versions and the legacy version normalizer
//! - Releases and their security classification
//! - Projects with their supported branches
//! - Range constraints in composer notation
//! - Release categories (Drupal generations)
//! - Per-package outcomes and the build summary

mod category;
mod constraint;
mod outcome;
mod project;
mod release;
mod summary;
mod version;

pub use category::ReleaseCategory;
pub use constraint::{any_matches, parse_constraints, Bound, Constraint, Operator, MATCH_ALL_TOKEN};
pub use outcome::{Outcome, PackageResult};
pub use project::{Project, ProjectRecord, ProjectStatus};
pub use release::{classify, Classification, Release, ReleaseRecord, ReleaseType};
pub use summary::BuildSummary;
pub use version::{is_normalizable, normalize, normalize_supported_branch, Stability, Version};
