//! Project index adapter
//!
//! Lists every project that has at least one release tagged insecure or
//! security update, using the drupal.org REST listing.
//! API endpoint: https://www.drupal.org/api-d7/node.json

use crate::domain::ReleaseCategory;
use crate::error::{RegistryError, ValidationError};
use crate::registry::DocumentFetcher;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// drupal.org node listing endpoint
const NODE_LIST_URL: &str = "https://www.drupal.org/api-d7/node.json";

/// Release type taxonomy term for "Insecure"
pub const INSECURE_TERM_ID: u32 = 188131;

/// Release type taxonomy term for "Security update"
pub const SECURITY_UPDATE_TERM_ID: u32 = 100;

#[derive(Debug, Deserialize)]
struct NodeListPage {
    last: Option<String>,
    #[serde(default)]
    list: Vec<NodeListItem>,
}

#[derive(Debug, Deserialize)]
struct NodeListItem {
    url: Option<String>,
}

/// drupal.org release listing adapter
pub struct ProjectIndexAdapter<'a> {
    fetcher: &'a dyn DocumentFetcher,
    category: ReleaseCategory,
}

impl<'a> ProjectIndexAdapter<'a> {
    pub fn new(fetcher: &'a dyn DocumentFetcher, category: ReleaseCategory) -> Self {
        Self { fetcher, category }
    }

    /// Build the listing URL for one page of releases tagged `term_id`
    pub fn build_url(&self, term_id: u32, page: u32) -> String {
        format!(
            "{}?type=project_release&taxonomy_vocabulary_7={}&field_release_build_type=static&page={}&field_release_category={}",
            NODE_LIST_URL,
            term_id,
            page,
            self.category.api_category()
        )
    }

    /// Names of all projects with insecure or security releases, first seen first
    pub async fn project_names(&self) -> Result<Vec<String>, RegistryError> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for term_id in [INSECURE_TERM_ID, SECURITY_UPDATE_TERM_ID] {
            let first = self.fetch_page(term_id, 0).await?;
            let last_page = first.last.as_deref().map(pager_value).unwrap_or(0);
            debug!(term_id, pages = last_page + 1, "listing releases");

            collect_names(&first, &mut seen, &mut names);
            for page in 1..=last_page {
                let listing = self.fetch_page(term_id, page).await?;
                collect_names(&listing, &mut seen, &mut names);
            }
        }

        info!(projects = names.len(), category = %self.category, "resolved project index");
        Ok(names)
    }

    async fn fetch_page(&self, term_id: u32, page: u32) -> Result<NodeListPage, RegistryError> {
        let url = self.build_url(term_id, page);
        let body = self.fetcher.fetch(&url).await?;
        serde_json::from_str(&body).map_err(|e| {
            RegistryError::invalid_response(&url, format!("failed to parse JSON: {}", e))
        })
    }
}

fn collect_names(page: &NodeListPage, seen: &mut HashSet<String>, names: &mut Vec<String>) {
    for url in page.list.iter().filter_map(|item| item.url.as_deref()) {
        match parse_project_name(url) {
            Ok(name) => {
                if seen.insert(name.clone()) {
                    names.push(name);
                }
            }
            Err(e) => warn!(url, error = %e, "skipping release"),
        }
    }
}

/// Extracts `<name>` from `https://www.drupal.org/project/<name>/releases/<version>`
pub fn parse_project_name(url: &str) -> Result<String, ValidationError> {
    let parsed = Url::parse(url)
        .map_err(|e| ValidationError::invalid_document(format!("invalid release URL: {}", e)))?;

    let mut segments = parsed.path().trim_start_matches('/').split('/');
    match (segments.next(), segments.next()) {
        (Some("project"), Some(name)) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(ValidationError::invalid_document(format!(
            "failed to parse project name from '{}'",
            url
        ))),
    }
}

/// Reads the `page` query value of a pager URL, 0 when absent
pub fn pager_value(url: &str) -> u32 {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "page")
                .and_then(|(_, value)| value.parse().ok())
        })
        .unwrap_or(0)
}
