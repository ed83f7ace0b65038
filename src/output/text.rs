//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-project constraint listing with colors (verbose mode)
//! - Failed project display with reasons
//! - Summary with generated/skipped/failed breakdown

use crate::domain::{BuildSummary, Outcome, PackageResult};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Minimum column width for project names
const NAME_COLUMN: usize = 20;

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    dry_run: bool,
    color: bool,
}

impl TextFormatter {
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    fn dry_run_prefix(&self) -> String {
        if !self.dry_run {
            String::new()
        } else if self.color {
            format!("{} ", "(dry-run)".cyan())
        } else {
            "(dry-run) ".to_string()
        }
    }

    fn max_name_length<'a>(&self, packages: impl Iterator<Item = &'a PackageResult>) -> usize {
        packages
            .map(|p| p.project.len())
            .max()
            .unwrap_or(0)
            .max(NAME_COLUMN)
    }

    /// Format one project line
    fn format_package_line(
        &self,
        package: &PackageResult,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if !self.color {
            return writeln!(
                writer,
                "  {:width$} {}",
                package.project,
                package.outcome,
                width = width
            );
        }

        let name = format!("{:width$}", package.project, width = width);
        match &package.outcome {
            Outcome::Generated { constraint } => {
                writeln!(writer, "  {} {}", name, constraint.bright_white().bold())
            }
            Outcome::NoConstraint => {
                writeln!(writer, "  {} {}", name.dimmed(), "(no constraint)".dimmed())
            }
            Outcome::Failed { message } => {
                writeln!(writer, "  {} {} {}", name, "✗".red(), message.red())
            }
        }
    }

    /// Lists every project and its outcome
    fn format_packages(&self, summary: &BuildSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if summary.packages.is_empty() {
            return Ok(());
        }
        let width = self.max_name_length(summary.packages.iter());

        if self.color {
            writeln!(writer, "{}", "Conflicts:".bold())?;
        } else {
            writeln!(writer, "Conflicts:")?;
        }
        for package in &summary.packages {
            self.format_package_line(package, width, writer)?;
        }
        writeln!(writer)
    }

    /// Lists only failed projects
    fn format_failures(&self, summary: &BuildSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if !summary.has_failures() {
            return Ok(());
        }
        let width = self.max_name_length(summary.failed());

        if self.color {
            writeln!(writer, "{}:", "Failed".red().bold())?;
        } else {
            writeln!(writer, "Failed:")?;
        }
        for package in summary.failed() {
            self.format_package_line(package, width, writer)?;
        }
        writeln!(writer)
    }

    fn format_manifest_line(
        &self,
        summary: &BuildSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let path = summary.manifest_path.display().to_string();
        let state = if summary.dry_run {
            "not written"
        } else if summary.modified {
            "written"
        } else {
            "unchanged"
        };

        if self.color {
            writeln!(writer, "  {} {}", path.bold(), format!("({})", state).dimmed())
        } else {
            writeln!(writer, "  {} ({})", path, state)
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        // In quiet mode, only show summary
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&result.summary, writer);
        }

        if self.verbosity == Verbosity::Verbose {
            self.format_packages(&result.summary, writer)?;
        } else {
            self.format_failures(&result.summary, writer)?;
        }

        // Errors not tied to a single project
        let other_errors: Vec<_> = result
            .errors
            .iter()
            .filter(|e| !matches!(e, crate::orchestrator::OrchestratorError::FetchError { .. }))
            .collect();
        if !other_errors.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Errors".red().bold())?;
            } else {
                writeln!(writer, "Errors:")?;
            }
            for error in other_errors {
                if self.color {
                    writeln!(writer, "  {} {}", "✗".red(), error)?;
                } else {
                    writeln!(writer, "  - {}", error)?;
                }
            }
            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &BuildSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let generated = summary.generated_count();
        let skipped = summary.skipped_count();
        let failed = summary.failed_count();

        if self.verbosity == Verbosity::Quiet {
            if self.color {
                let failed_display = if failed > 0 {
                    format!(", {} failed", failed.to_string().red())
                } else {
                    String::new()
                };
                return writeln!(
                    writer,
                    "{}{} conflicts{}",
                    prefix,
                    generated.to_string().green(),
                    failed_display
                );
            }
            let failed_display = if failed > 0 {
                format!(", {} failed", failed)
            } else {
                String::new()
            };
            return writeln!(writer, "{}{} conflicts{}", prefix, generated, failed_display);
        }

        if self.color {
            writeln!(
                writer,
                "{}{} ({}):",
                prefix,
                "Summary".bold(),
                summary.category
            )?;
            writeln!(
                writer,
                "  {} project(s) processed",
                summary.total_packages().to_string().bold()
            )?;
            writeln!(
                writer,
                "  {} conflict rule(s) generated",
                generated.to_string().green()
            )?;
            if skipped > 0 {
                writeln!(
                    writer,
                    "  {} project(s) without constraint",
                    skipped.to_string().dimmed()
                )?;
            }
            if failed > 0 {
                writeln!(writer, "  {} project(s) failed", failed.to_string().red())?;
            }
        } else {
            writeln!(writer, "{}Summary ({}):", prefix, summary.category)?;
            writeln!(writer, "  {} project(s) processed", summary.total_packages())?;
            writeln!(writer, "  {} conflict rule(s) generated", generated)?;
            if skipped > 0 {
                writeln!(writer, "  {} project(s) without constraint", skipped)?;
            }
            if failed > 0 {
                writeln!(writer, "  {} project(s) failed", failed)?;
            }
        }

        self.format_manifest_line(summary, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReleaseCategory;
    use crate::orchestrator::OrchestratorError;

    fn summary(dry_run: bool) -> BuildSummary {
        let mut summary =
            BuildSummary::new(ReleaseCategory::Current, "build/composer-9.x.json", dry_run);
        summary.add_package(PackageResult::generated("views", "<1.0.0|>=2.0.0,<2.0.1"));
        summary.add_package(PackageResult::no_constraint("token"));
        summary.add_package(PackageResult::failed("nope", "'nope' not found"));
        summary
    }

    fn result(summary: BuildSummary) -> OrchestratorResult {
        OrchestratorResult {
            summary,
            write_result: None,
            errors: Vec::new(),
        }
    }

    fn render(formatter: &TextFormatter, result: &OrchestratorResult) -> String {
        let mut output = Vec::new();
        formatter.format(result, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let output = render(&formatter, &result(summary(false)));
        assert!(output.contains("Summary (current):"));
        assert!(output.contains("3 project(s) processed"));
        assert!(output.contains("1 conflict rule(s) generated"));
        assert!(output.contains("1 project(s) without constraint"));
        assert!(output.contains("1 project(s) failed"));
        assert!(output.contains("build/composer-9.x.json (unchanged)"));
    }

    #[test]
    fn test_normal_mode_lists_only_failures() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let output = render(&formatter, &result(summary(false)));
        assert!(output.contains("Failed:"));
        assert!(output.contains("failed: 'nope' not found"));
        assert!(!output.contains("<1.0.0|>=2.0.0,<2.0.1"));
    }

    #[test]
    fn test_verbose_mode_lists_constraints() {
        let formatter = TextFormatter::with_color(Verbosity::Verbose, false, false);
        let output = render(&formatter, &result(summary(false)));
        assert!(output.contains("Conflicts:"));
        assert!(output.contains("<1.0.0|>=2.0.0,<2.0.1"));
        assert!(output.contains("no constraint"));
    }

    #[test]
    fn test_quiet_mode() {
        let formatter = TextFormatter::with_color(Verbosity::Quiet, false, false);
        let output = render(&formatter, &result(summary(false)));
        assert_eq!(output, "1 conflicts, 1 failed\n");
    }

    #[test]
    fn test_dry_run_prefix() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, true, false);
        let output = render(&formatter, &result(summary(true)));
        assert!(output.contains("(dry-run) Summary"));
        assert!(output.contains("(not written)"));
    }

    #[test]
    fn test_written_manifest() {
        let mut summary = summary(false);
        summary.modified = true;
        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let output = render(&formatter, &result(summary));
        assert!(output.contains("(written)"));
    }

    #[test]
    fn test_non_project_errors_are_listed() {
        let mut result = result(BuildSummary::new(
            ReleaseCategory::Legacy,
            "build/composer-7.x.json",
            false,
        ));
        result
            .errors
            .push(OrchestratorError::IndexError("timeout".to_string()));
        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let output = render(&formatter, &result);
        assert!(output.contains("Errors:"));
        assert!(output.contains("- Failed to list projects: timeout"));
    }
}
