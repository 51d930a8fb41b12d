//! Human-readable console output.
//!
//! The pipeline itself never prints; it reports through
//! [`PipelineObserver`](crate::pipeline::PipelineObserver). This module
//! provides the observer used by the CLI, which writes one announcement per
//! move, skip or removal to stdout and closes with a summary.
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::output::ConsoleReporter;
//! use flatdupe::pipeline::{Pipeline, PipelineConfig};
//! use flatdupe::scanner::HashAlgorithm;
//! use std::path::Path;
//!
//! let pipeline = Pipeline::new(Path::new("."), PipelineConfig::default()).unwrap();
//! let reporter = ConsoleReporter::new(false, true, HashAlgorithm::Sha256);
//! reporter.print_header(pipeline.layout());
//! let summary = pipeline.run(&reporter).unwrap();
//! reporter.print_summary(&summary);
//! ```

pub mod console;

// Re-export main types
pub use console::ConsoleReporter;
