//! Logging initialization
//!
//! Diagnostics go to stderr through `tracing-subscriber` so that stdout
//! stays reserved for the build summary (and its JSON form).

use crate::output::Verbosity;
use anyhow::Result;
use clap::ValueEnum;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Default filter directive for a verbosity level
pub fn default_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "warn",
        Verbosity::Normal => "info",
        Verbosity::Verbose => "debug",
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity-derived level. Must be
/// called at most once per process.
pub fn init_tracing(verbosity: Verbosity, format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize pretty tracing subscriber: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(Verbosity::Quiet), "warn");
        assert_eq!(default_directive(Verbosity::Normal), "info");
        assert_eq!(default_directive(Verbosity::Verbose), "debug");
    }

    #[test]
    fn test_log_format_default() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn test_second_init_fails() {
        // Another test may have installed a subscriber first; either way the
        // second call in this process must be rejected.
        let _ = init_tracing(Verbosity::Quiet, LogFormat::Json);
        assert!(init_tracing(Verbosity::Quiet, LogFormat::Pretty).is_err());
    }
}
