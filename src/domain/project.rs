//! Project aggregate: governance metadata plus all known releases

use super::release::{Release, ReleaseRecord};
use super::version::{normalize_supported_branch, Version};
use crate::error::ValidationError;
use std::collections::btree_map::{BTreeMap, Entry};
use std::fmt;
use std::str::FromStr;

/// Governance status of a project on drupal.org
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectStatus {
    Published,
    Unpublished,
    Unsupported,
}

impl ProjectStatus {
    const CHOICES: [&'static str; 3] = ["published", "unpublished", "unsupported"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Published => "published",
            ProjectStatus::Unpublished => "unpublished",
            ProjectStatus::Unsupported => "unsupported",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(ProjectStatus::Published),
            "unpublished" => Ok(ProjectStatus::Unpublished),
            "unsupported" => Ok(ProjectStatus::Unsupported),
            other => Err(ValidationError::invalid_choice(
                "[project_status]",
                other,
                &Self::CHOICES,
            )),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unvalidated project data as read from the release-history feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRecord {
    pub project_status: Option<String>,
    pub supported_branches: Vec<String>,
    pub releases: Vec<ReleaseRecord>,
}

/// Identity of a release for de-duplication
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum ReleaseKey {
    Version(Version),
    Raw(String),
}

impl ReleaseKey {
    fn of(release: &Release) -> Self {
        match Version::parse(release.semantic_version()) {
            Ok(version) => ReleaseKey::Version(version),
            Err(_) => ReleaseKey::Raw(release.semantic_version().to_string()),
        }
    }
}

/// All known releases of one package, in feed order (newest first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    status: ProjectStatus,
    supported_branches: Vec<String>,
    releases: Vec<Release>,
}

impl Project {
    /// Creates a project from already validated releases.
    ///
    /// Blank supported branches are dropped. Releases whose versions
    /// compare equal (`2.0` and `2.0.0`) collapse into one entry holding
    /// the later record and the labels of both.
    pub fn new(
        status: ProjectStatus,
        supported_branches: impl IntoIterator<Item = impl Into<String>>,
        releases: impl IntoIterator<Item = Release>,
    ) -> Self {
        let supported_branches = supported_branches
            .into_iter()
            .map(Into::into)
            .filter(|branch: &String| !branch.trim().is_empty())
            .collect();

        let mut unique: Vec<Release> = Vec::new();
        let mut positions: BTreeMap<ReleaseKey, usize> = BTreeMap::new();
        for release in releases {
            match positions.entry(ReleaseKey::of(&release)) {
                Entry::Occupied(slot) => unique[*slot.get()].supersede(release),
                Entry::Vacant(slot) => {
                    slot.insert(unique.len());
                    unique.push(release);
                }
            }
        }

        Self {
            status,
            supported_branches,
            releases: unique,
        }
    }

    /// Validates a feed record and builds the project from it
    pub fn from_record(record: ProjectRecord) -> Result<Self, ValidationError> {
        let status: ProjectStatus = record
            .project_status
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ValidationError::missing_field("[project_status]"))?
            .parse()?;

        let releases = record
            .releases
            .into_iter()
            .map(Release::from_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(status, record.supported_branches, releases))
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn is_unsupported(&self) -> bool {
        self.status == ProjectStatus::Unsupported
    }

    pub fn is_published(&self) -> bool {
        self.status == ProjectStatus::Published
    }

    /// Supported branches as declared upstream (e.g. `8.x-1.`)
    pub fn supported_branches(&self) -> &[String] {
        &self.supported_branches
    }

    /// Supported branches in semantic form (e.g. `1.0.0`)
    pub fn normalized_supported_branches(&self) -> Vec<String> {
        self.supported_branches
            .iter()
            .map(|branch| normalize_supported_branch(branch))
            .collect()
    }

    /// Releases in feed order
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }
}
