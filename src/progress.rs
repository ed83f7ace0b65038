//! Progress display for metapackage builds
//!
//! Provides visual feedback on stderr while the project index is crawled
//! and release histories are fetched, using indicatif.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const BAR_TEMPLATE: &str = "{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len} ({eta})";

/// Progress reporter for the build workflow
pub struct Progress {
    /// Whether progress display is enabled (disabled in quiet and JSON mode)
    enabled: bool,
    /// Current progress bar
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Show a spinner while the number of items is still unknown
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Start a progress bar over `total` projects
    pub fn start(&mut self, total: u64, message: &str) {
        if !self.enabled {
            return;
        }

        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    pub fn inc(&self) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Finish the current progress bar with a message
    pub fn finish(&mut self, message: &str) {
        if let Some(ref bar) = self.bar {
            bar.finish_with_message(message.to_string());
        }
        self.bar = None;
    }

    /// Finish and clear the current progress bar
    pub fn finish_and_clear(&mut self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        self.bar = None;
    }

    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_are_valid() {
        assert!(ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .is_ok());
        assert!(ProgressStyle::default_bar().template(BAR_TEMPLATE).is_ok());
    }

    #[test]
    fn test_progress_disabled() {
        let mut progress = Progress::disabled();
        progress.spinner("Listing projects");
        assert!(!progress.is_active());
        progress.start(10, "Deriving constraints");
        assert!(!progress.is_active());
        progress.inc();
        progress.set_message("views");
        progress.finish("done");
    }

    #[test]
    fn test_progress_enabled() {
        let mut progress = Progress::new(true);
        progress.start(3, "Deriving constraints");
        assert!(progress.is_active());
        progress.inc();
        progress.set_message("Derived views");
        progress.inc();
        progress.finish_and_clear();
        assert!(!progress.is_active());
    }
}
