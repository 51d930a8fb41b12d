//! flatdupe - deduplicate by content, then flatten
//!
//! A command-line tool that transforms a folder tree in three passes:
//! duplicate files (by SHA-256 or BLAKE3 content digest) are moved into a
//! `_duplicates` quarantine folder, remaining files are moved up into the
//! root folder, and folders left empty are removed.

pub mod actions;
pub mod cli;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod scanner;

use std::io::IsTerminal;

use anyhow::Result;

use cli::Cli;
use error::ExitCode;
use output::ConsoleReporter;
use pipeline::{Pipeline, PipelineConfig};

/// Run the application with parsed arguments.
///
/// # Errors
///
/// Returns an error if the root is not a directory or the quarantine folder
/// cannot be created. Per-file failures are reported and do not make the
/// run fail.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color || !std::io::stdout().is_terminal() {
        yansi::disable();
    }

    let config = PipelineConfig::default().with_hash_algorithm(cli.hash.into());
    let pipeline = Pipeline::new(&cli.path, config)?;
    log::debug!(
        "Processing {} (quarantine: {})",
        pipeline.layout().root().display(),
        pipeline.layout().quarantine().display()
    );

    let reporter = ConsoleReporter::new(
        cli.quiet,
        !cli.no_progress,
        pipeline.config().hash_algorithm,
    );
    reporter.print_header(pipeline.layout());

    let summary = pipeline.run(&reporter)?;
    reporter.print_summary(&summary);

    Ok(ExitCode::Success)
}
