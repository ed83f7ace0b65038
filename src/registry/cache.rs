//! On-disk response cache
//!
//! A full build fetches thousands of release histories. Responses are kept
//! in a directory keyed by the SHA-256 of the URL so that re-runs within
//! the TTL do not hit drupal.org again.

use crate::error::RegistryError;
use crate::registry::DocumentFetcher;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// Default lifetime of a cached response (1 hour)
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Wraps a fetcher with a TTL-bounded file cache
pub struct CachedFetcher<F> {
    inner: F,
    dir: PathBuf,
    ttl: Duration,
}

impl<F: DocumentFetcher> CachedFetcher<F> {
    pub fn new(inner: F, dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            inner,
            dir: dir.into(),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache file for a URL
    pub fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(cache_key(url))
    }

    async fn read_fresh(&self, path: &Path) -> Option<String> {
        let metadata = tokio::fs::metadata(path).await.ok()?;
        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())?;
        if age >= self.ttl {
            return None;
        }
        tokio::fs::read_to_string(path).await.ok()
    }

    async fn store(&self, path: &Path, body: &str) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(path, body).await
    }
}

#[async_trait]
impl<F: DocumentFetcher> DocumentFetcher for CachedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, RegistryError> {
        let path = self.entry_path(url);
        if let Some(body) = self.read_fresh(&path).await {
            debug!(url, "cache hit");
            return Ok(body);
        }

        let body = self.inner.fetch(url).await?;
        // A cache that cannot be written only costs a refetch.
        if let Err(e) = self.store(&path, &body).await {
            warn!(path = %path.display(), error = %e, "failed to write cache entry");
        }
        Ok(body)
    }
}

/// Hex-encoded SHA-256 of the URL
pub fn cache_key(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}
