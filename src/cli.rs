//! Command-line interface definitions for flatdupe.
//!
//! One positional argument, the folder to process, plus a few global flags
//! for logging, color and progress.
//!
//! # Example
//!
//! ```bash
//! # Deduplicate and flatten ~/Downloads/sorted
//! flatdupe ~/Downloads/sorted
//!
//! # Same, with BLAKE3 digests and debug logging
//! flatdupe -v --hash blake3 ~/Downloads/sorted
//! ```

use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::scanner::HashAlgorithm;

/// Deduplicate a folder tree by content and flatten it into the root folder.
///
/// Files with identical content are kept once; every other copy is moved to
/// a _duplicates folder under the root (nothing is deleted). Remaining files
/// from subfolders are moved into the root, and empty subfolders are removed.
#[derive(Debug, Parser)]
#[command(name = "flatdupe")]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Folder to deduplicate and flatten
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors and the final summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Do not draw a progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Content hash algorithm
    #[arg(long, value_enum, default_value = "sha256")]
    pub hash: HashArg,
}

/// Hash algorithm argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum HashArg {
    /// SHA-256
    #[default]
    Sha256,
    /// BLAKE3
    Blake3,
}

impl From<HashArg> for HashAlgorithm {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::Sha256 => HashAlgorithm::Sha256,
            HashArg::Blake3 => HashAlgorithm::Blake3,
        }
    }
}
