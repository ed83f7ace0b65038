//! Release-history adapter
//!
//! Fetches a project's release history from updates.drupal.org.
//! API endpoint: https://updates.drupal.org/release-history/{project}/{current|7.x}

use crate::domain::{Project, ProjectRecord, ReleaseCategory, ReleaseRecord};
use crate::error::{RegistryError, ValidationError};
use crate::registry::DocumentFetcher;
use serde::Deserialize;
use tracing::debug;

/// Release-history base URL
const RELEASE_HISTORY_URL: &str = "https://updates.drupal.org/release-history";

/// Term whose values are the release type labels
const RELEASE_TYPE_TERM: &str = "Release type";

/// Project name whose legacy branches are core branches (`7.`)
const CORE_PROJECT: &str = "drupal";

#[derive(Debug, Deserialize)]
struct HistoryDocument {
    short_name: Option<String>,
    project_status: Option<String>,
    supported_branches: Option<String>,
    supported_majors: Option<String>,
    releases: Option<ReleaseList>,
}

#[derive(Debug, Default, Deserialize)]
struct ReleaseList {
    #[serde(default)]
    release: Vec<ReleaseNode>,
}

#[derive(Debug, Deserialize)]
struct ReleaseNode {
    version: Option<String>,
    status: Option<String>,
    terms: Option<TermList>,
}

#[derive(Debug, Default, Deserialize)]
struct TermList {
    #[serde(default)]
    term: Vec<TermNode>,
}

#[derive(Debug, Deserialize)]
struct TermNode {
    name: Option<String>,
    value: Option<String>,
}

/// updates.drupal.org release-history adapter
pub struct ReleaseHistoryAdapter<'a> {
    fetcher: &'a dyn DocumentFetcher,
    category: ReleaseCategory,
}

impl<'a> ReleaseHistoryAdapter<'a> {
    pub fn new(fetcher: &'a dyn DocumentFetcher, category: ReleaseCategory) -> Self {
        Self { fetcher, category }
    }

    /// Build the URL for a project
    pub fn build_url(&self, project: &str) -> String {
        format!(
            "{}/{}/{}",
            RELEASE_HISTORY_URL,
            project,
            self.category.history_endpoint()
        )
    }

    /// Fetches and validates the release history of a project
    pub async fn fetch_project(&self, project: &str) -> Result<Project, RegistryError> {
        let url = self.build_url(project);
        let body = self.fetcher.fetch(&url).await?;

        let record =
            parse_release_history(&body).map_err(|e| RegistryError::validation(&url, e))?;
        debug!(
            project,
            releases = record.releases.len(),
            branches = ?record.supported_branches,
            "parsed release history"
        );
        Project::from_record(record).map_err(|e| RegistryError::validation(&url, e))
    }
}

/// Parses a release-history XML document into an unvalidated record
pub fn parse_release_history(xml: &str) -> Result<ProjectRecord, ValidationError> {
    let document: HistoryDocument = quick_xml::de::from_str(xml)
        .map_err(|e| ValidationError::invalid_document(format!("invalid XML: {}", e)))?;

    // Unknown projects are answered with an <error> document.
    let short_name = document
        .short_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ValidationError::invalid_document("missing short_name"))?;

    let mut supported_branches = split_list(document.supported_branches.as_deref());
    if supported_branches.is_empty() {
        supported_branches = legacy_branches(&short_name, document.supported_majors.as_deref());
    }

    let releases = document
        .releases
        .unwrap_or_default()
        .release
        .into_iter()
        .map(|node| ReleaseRecord {
            version: node.version,
            status: node.status,
            labels: node
                .terms
                .unwrap_or_default()
                .term
                .into_iter()
                .filter(|term| term.name.as_deref() == Some(RELEASE_TYPE_TERM))
                .filter_map(|term| term.value)
                .collect(),
        })
        .collect();

    Ok(ProjectRecord {
        project_status: document.project_status,
        supported_branches,
        releases,
    })
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drupal 7 projects declare `supported_majors` instead of branches
fn legacy_branches(short_name: &str, supported_majors: Option<&str>) -> Vec<String> {
    let majors = split_list(supported_majors);
    if majors.is_empty() {
        return Vec::new();
    }
    if short_name == CORE_PROJECT {
        return vec!["7.".to_string()];
    }
    majors
        .iter()
        .map(|major| format!("7.x-{}.", major))
        .collect()
}
