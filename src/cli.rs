//! CLI argument parsing module for drupal-security-advisories

use crate::domain::ReleaseCategory;
use crate::error::ConfigError;
use crate::logging::LogFormat;
use crate::orchestrator::DEFAULT_CONCURRENCY;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Directory name of the default HTTP cache under the system temp dir
const CACHE_DIR_NAME: &str = "dsa-http-cache";

/// Builds the drupal/* security advisories composer metapackage
#[derive(Parser, Debug, Clone)]
#[command(
    name = "drupal-security-advisories",
    version,
    about = "Builds the drupal-security-advisories composer metapackage"
)]
pub struct CliArgs {
    /// Release category to build: current (Drupal 8+) or legacy (7.x)
    #[arg(default_value = "current")]
    pub category: ReleaseCategory,

    /// Directory the composer-*.json manifest is written to
    #[arg(long, env = "DSA_BUILD_DIR", default_value = "build")]
    pub build_dir: PathBuf,

    // HTTP cache
    /// Directory for cached drupal.org responses (default: <tmp>/dsa-http-cache)
    #[arg(long, env = "DSA_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Seconds a cached response stays fresh
    #[arg(long, default_value_t = 3600)]
    pub cache_ttl: u64,

    /// Always fetch from drupal.org
    #[arg(long)]
    pub no_cache: bool,

    /// Maximum number of concurrent release-history requests
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    // Project filter
    /// Build only these projects instead of crawling the index (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    // General options
    /// Dry run mode - derive constraints without writing the manifest
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Format of diagnostic logs on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl CliArgs {
    /// Cache directory, falling back to the system temp dir
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(CACHE_DIR_NAME))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Check that option values make sense together
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency {
                value: self.concurrency,
            });
        }
        if self.build_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidPath {
                path: self.build_dir.clone(),
                message: "build directory must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
