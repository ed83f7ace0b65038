//! Build orchestrator for coordinating the entire metapackage build
//!
//! This module provides:
//! - Workflow coordination: load manifest → list projects → fetch → derive → write
//! - Parallel release-history queries bounded by a semaphore
//! - Dry-run mode support
//! - Error handling with partial continuation

use crate::cli::CliArgs;
use crate::derivation::derive_rendered;
use crate::domain::{BuildSummary, PackageResult, ReleaseCategory};
use crate::manifest::{manifest_path, ComposerManifest, ManifestWriter, WriteResult};
use crate::progress::Progress;
use crate::registry::{
    CachedFetcher, DocumentFetcher, HttpClient, ProjectIndexAdapter, ReleaseHistoryAdapter,
};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Default concurrency limit for release-history requests
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Orchestrator for coordinating the build workflow
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Source of drupal.org documents
    fetcher: Arc<dyn DocumentFetcher>,
    /// Bounds concurrent release-history requests
    semaphore: Arc<Semaphore>,
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Build summary with all package results
    pub summary: BuildSummary,
    /// Result of writing the manifest, if it got that far
    pub write_result: Option<WriteResult>,
    /// Errors encountered during processing
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    fn new(summary: BuildSummary) -> Self {
        Self {
            summary,
            write_result: None,
            errors: Vec::new(),
        }
    }
}

/// Errors that can occur during orchestration
#[derive(Debug)]
pub enum OrchestratorError {
    /// Failed to create HTTP client
    HttpClientError(String),
    /// Failed to list projects with security releases
    IndexError(String),
    /// Failed to fetch or validate a release history
    FetchError { project: String, message: String },
    /// Failed to load the existing manifest
    ManifestError { path: String, message: String },
    /// Failed to write manifest
    WriteError { path: String, message: String },
    /// A worker task died
    TaskError(String),
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::HttpClientError(msg) => write!(f, "HTTP client error: {}", msg),
            OrchestratorError::IndexError(msg) => write!(f, "Failed to list projects: {}", msg),
            OrchestratorError::FetchError { project, message } => {
                write!(f, "Failed to fetch {}: {}", project, message)
            }
            OrchestratorError::ManifestError { path, message } => {
                write!(f, "Failed to load {}: {}", path, message)
            }
            OrchestratorError::WriteError { path, message } => {
                write!(f, "Failed to write {}: {}", path, message)
            }
            OrchestratorError::TaskError(msg) => write!(f, "Worker task failed: {}", msg),
        }
    }
}

impl std::error::Error for OrchestratorError {}

impl Orchestrator {
    /// Create a new orchestrator talking to drupal.org
    pub fn new(args: CliArgs) -> Result<Self, OrchestratorError> {
        let client =
            HttpClient::new().map_err(|e| OrchestratorError::HttpClientError(e.to_string()))?;

        let fetcher: Arc<dyn DocumentFetcher> = if args.no_cache {
            Arc::new(client)
        } else {
            Arc::new(CachedFetcher::new(client, args.cache_dir(), args.cache_ttl()))
        };

        Ok(Self::with_fetcher(args, fetcher))
    }

    /// Create an orchestrator with a custom document source (for testing)
    pub fn with_fetcher(args: CliArgs, fetcher: Arc<dyn DocumentFetcher>) -> Self {
        let permits = args.concurrency.max(1);
        Self {
            args,
            fetcher,
            semaphore: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Run the build workflow
    pub async fn run(&self) -> OrchestratorResult {
        self.run_with_progress(!self.args.quiet && !self.args.json)
            .await
    }

    /// Run the build workflow with optional progress display
    pub async fn run_with_progress(&self, show_progress: bool) -> OrchestratorResult {
        let mut progress = Progress::new(show_progress);
        let category = self.args.category;
        let path = manifest_path(&self.args.build_dir, category);
        let mut result =
            OrchestratorResult::new(BuildSummary::new(category, &path, self.args.dry_run));

        // Step 1: Load the existing manifest before spending time on the network
        let mut manifest = match ComposerManifest::load(&path) {
            Ok(manifest) => manifest,
            Err(e) => {
                result.errors.push(OrchestratorError::ManifestError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
                return result;
            }
        };

        // Step 2: Resolve the projects to build
        progress.spinner("Listing projects with security releases...");
        let projects = match self.resolve_projects().await {
            Ok(projects) => projects,
            Err(e) => {
                progress.finish_and_clear();
                result
                    .errors
                    .push(OrchestratorError::IndexError(e.to_string()));
                return result;
            }
        };
        progress.finish_and_clear();
        info!(projects = projects.len(), %category, "building metapackage");

        // Step 3: Fetch release histories and derive constraints
        progress.start(projects.len() as u64, "Deriving constraints");
        let mut tasks = JoinSet::new();
        for project in projects {
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&self.semaphore);
            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return PackageResult::failed(project, e.to_string()),
                };
                build_package(fetcher.as_ref(), category, &project).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(package) => {
                    progress.set_message(&format!("Derived {}", package.project));
                    if let Some(message) = failure_message(&package) {
                        result.errors.push(OrchestratorError::FetchError {
                            project: package.project.clone(),
                            message,
                        });
                    }
                    result.summary.add_package(package);
                }
                Err(e) => result.errors.push(OrchestratorError::TaskError(e.to_string())),
            }
            progress.inc();
        }
        progress.finish_and_clear();
        result.summary.sort();

        // Step 4: Merge into the manifest and write it (unless dry-run)
        for package in result.summary.generated() {
            if let Some(constraint) = package.constraint() {
                manifest.set_conflict(&package.project, constraint);
            }
        }
        manifest.mirror_core_alias();
        manifest.set_changed(Utc::now().timestamp());

        let writer = ManifestWriter::new(self.args.dry_run);
        match writer.write(&manifest, &path) {
            Ok(write_result) => {
                result.summary.modified = write_result.file_modified;
                result.write_result = Some(write_result);
            }
            Err(e) => result.errors.push(OrchestratorError::WriteError {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        }

        result
    }

    /// Projects named with --only, or every project in the drupal.org index
    async fn resolve_projects(&self) -> Result<Vec<String>, crate::error::RegistryError> {
        if !self.args.only.is_empty() {
            let mut seen = HashSet::new();
            return Ok(self
                .args
                .only
                .iter()
                .filter(|name| seen.insert(name.as_str()))
                .cloned()
                .collect());
        }

        ProjectIndexAdapter::new(self.fetcher.as_ref(), self.args.category)
            .project_names()
            .await
    }
}

/// Fetches one project's release history and derives its conflict rule
pub async fn build_package(
    fetcher: &dyn DocumentFetcher,
    category: ReleaseCategory,
    project: &str,
) -> PackageResult {
    let adapter = ReleaseHistoryAdapter::new(fetcher, category);
    match adapter.fetch_project(project).await {
        Ok(history) => match derive_rendered(&history) {
            Some(constraint) => {
                info!(project, %constraint, "derived constraint");
                PackageResult::generated(project, constraint)
            }
            None => {
                debug!(project, "no constraint derived");
                PackageResult::no_constraint(project)
            }
        },
        Err(e) => {
            warn!(project, error = %e, "skipping project");
            PackageResult::failed(project, e.to_string())
        }
    }
}

fn failure_message(package: &PackageResult) -> Option<String> {
    match &package.outcome {
        crate::domain::Outcome::Failed { message } => Some(message.clone()),
        _ => None,
    }
}
