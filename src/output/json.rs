//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the build summary
//! - Per-project outcomes (verbose mode adds projects without constraint)

use crate::domain::{BuildSummary, PackageResult};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    category: String,
    manifest: String,
    dry_run: bool,
    modified: bool,
    summary: JsonSummary,
    packages: Vec<&'a PackageResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    processed: usize,
    generated: usize,
    skipped: usize,
    failed: usize,
}

impl From<&BuildSummary> for JsonSummary {
    fn from(summary: &BuildSummary) -> Self {
        Self {
            processed: summary.total_packages(),
            generated: summary.generated_count(),
            skipped: summary.skipped_count(),
            failed: summary.failed_count(),
        }
    }
}

impl JsonFormatter {
    fn packages<'a>(&self, summary: &'a BuildSummary) -> Vec<&'a PackageResult> {
        summary
            .packages
            .iter()
            .filter(|p| self.verbosity == Verbosity::Verbose || p.is_generated() || p.is_failed())
            .collect()
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = &result.summary;
        let output = JsonOutput {
            category: summary.category.to_string(),
            manifest: summary.manifest_path.display().to_string(),
            dry_run: summary.dry_run,
            modified: summary.modified,
            summary: JsonSummary::from(summary),
            packages: self.packages(summary),
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }

    fn format_summary(
        &self,
        summary: &BuildSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&JsonSummary::from(summary))
            .map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}
