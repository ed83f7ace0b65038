//! drupal.org data sources
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - On-disk response cache
//! - Project index adapter (which projects have security releases)
//! - Release-history adapter (all releases of one project)

mod cache;
mod client;
mod project_index;
mod release_history;

pub use cache::{cache_key, CachedFetcher, DEFAULT_TTL};
pub use client::HttpClient;
pub use project_index::{
    pager_value, parse_project_name, ProjectIndexAdapter, INSECURE_TERM_ID,
    SECURITY_UPDATE_TERM_ID,
};
pub use release_history::{parse_release_history, ReleaseHistoryAdapter};

use crate::error::RegistryError;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of raw response bodies keyed by URL
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the body at `url`
    async fn fetch(&self, url: &str) -> Result<String, RegistryError>;
}

#[async_trait]
impl<T: DocumentFetcher + ?Sized> DocumentFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, RegistryError> {
        (**self).fetch(url).await
    }
}

#[async_trait]
impl<T: DocumentFetcher + ?Sized> DocumentFetcher for Box<T> {
    async fn fetch(&self, url: &str) -> Result<String, RegistryError> {
        (**self).fetch(url).await
    }
}
