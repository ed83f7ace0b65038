//! drupal-security-advisories - composer metapackage builder
//!
//! Crawls drupal.org for projects with security releases and writes a
//! `composer-*.json` whose `conflict` section blocks every release known
//! to be vulnerable.

use clap::Parser;
use drupal_security_advisories::cli::CliArgs;
use drupal_security_advisories::logging::init_tracing;
use drupal_security_advisories::orchestrator::Orchestrator;
use drupal_security_advisories::output::{create_formatter, verbosity_from_flags, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    args.validate()?;
    init_tracing(verbosity_from_flags(args.verbose, args.quiet), args.log_format)?;

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        category = %args.category,
        repository = args.category.composer_repository(),
        build_dir = %args.build_dir.display(),
        dry_run = args.dry_run,
        "starting build"
    );

    let orchestrator = Orchestrator::new(args.clone())?;
    let result = orchestrator.run().await;

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.dry_run);
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    for err in &result.errors {
        error!(error = %err, "build error");
    }

    // The manifest was not produced at all
    if result.write_result.is_none() {
        return Ok(ExitCode::FAILURE);
    }

    if result.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Partial success - some projects failed
        Ok(ExitCode::from(2))
    }
}
