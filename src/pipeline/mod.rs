//! The three-pass deduplicate / flatten / prune pipeline.
//!
//! # Overview
//!
//! [`Pipeline::run`] transforms a directory tree in place:
//!
//! 1. [`Deduplicator`]: hash every file outside the quarantine directory and
//!    move second and later copies of any content into it
//! 2. [`Flattener`]: move every remaining nested file directly into the root
//! 3. [`Pruner`]: remove directories the first two passes left empty
//!
//! Each pass finishes before the next one starts and walks the live tree
//! again; no in-memory picture of the tree is shared between passes.
//!
//! Per-file failures never abort a run. They are collected in the pass
//! reports and announced through the [`PipelineObserver`]. Only an invalid
//! root or an unusable quarantine directory stops the pipeline, and both are
//! detected before anything is moved.
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::pipeline::{Pipeline, PipelineConfig};
//! use std::path::Path;
//!
//! let pipeline = Pipeline::new(Path::new("/data/inbox"), PipelineConfig::default())?;
//! let summary = pipeline.run(&())?;
//! println!("{} duplicates quarantined", summary.dedupe.duplicates.len());
//! # Ok::<(), flatdupe::pipeline::PipelineError>(())
//! ```

pub mod dedupe;
pub mod events;
pub mod flatten;
pub mod prune;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::actions::MAX_NAME_ATTEMPTS;
use crate::scanner::{ContainmentChecker, HashAlgorithm, Hasher, TreeWalker, DEFAULT_BLOCK_SIZE};

pub use dedupe::{DedupeReport, Deduplicator};
pub use events::{Event, Phase, PipelineObserver};
pub use flatten::{FlattenReport, Flattener};
pub use prune::{PruneReport, Pruner};

/// Name of the quarantine directory created under the root.
pub const QUARANTINE_DIR_NAME: &str = "_duplicates";

/// Suffix added to the stem of files moved into quarantine.
pub const DUPLICATE_SUFFIX: &str = "_dup";

/// Errors that stop the pipeline before it mutates anything.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The given root is not a directory.
    #[error("Not a folder: {0}")]
    InvalidRoot(PathBuf),

    /// The quarantine directory could not be created.
    #[error("Could not create duplicates folder {path}: {source}")]
    Quarantine {
        /// Quarantine directory path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Name of the quarantine directory under the root.
    pub quarantine_name: String,
    /// Suffix appended to the stem of quarantined files.
    pub duplicate_suffix: String,
    /// Numbered name candidates tried before giving up on a move.
    pub max_name_attempts: u32,
    /// Content digest algorithm.
    pub hash_algorithm: HashAlgorithm,
    /// Read block size for hashing.
    pub block_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            quarantine_name: QUARANTINE_DIR_NAME.to_string(),
            duplicate_suffix: DUPLICATE_SUFFIX.to_string(),
            max_name_attempts: MAX_NAME_ATTEMPTS,
            hash_algorithm: HashAlgorithm::default(),
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Set the hash algorithm.
    #[must_use]
    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    /// Set the name attempt bound.
    #[must_use]
    pub fn with_max_name_attempts(mut self, attempts: u32) -> Self {
        self.max_name_attempts = attempts;
        self
    }

    /// Set the read block size used for hashing.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Build the hasher this configuration describes.
    #[must_use]
    pub fn hasher(&self) -> Hasher {
        Hasher::new()
            .with_algorithm(self.hash_algorithm)
            .with_block_size(self.block_size)
    }
}

/// Root and quarantine locations shared by all passes.
#[derive(Debug, Clone)]
pub struct TreeLayout {
    root: PathBuf,
    quarantine: PathBuf,
    checker: ContainmentChecker,
}

impl TreeLayout {
    /// Describe a tree rooted at `root` with quarantine `root/quarantine_name`.
    ///
    /// Nothing is validated or created here.
    #[must_use]
    pub fn new(root: &Path, quarantine_name: &str) -> Self {
        let quarantine = root.join(quarantine_name);
        Self {
            root: root.to_path_buf(),
            checker: ContainmentChecker::new(&quarantine),
            quarantine,
        }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The quarantine directory.
    #[must_use]
    pub fn quarantine(&self) -> &Path {
        &self.quarantine
    }

    /// `true` if `path` is the quarantine directory or inside it.
    #[must_use]
    pub fn in_quarantine(&self, path: &Path) -> bool {
        self.checker.contains(path)
    }

    /// A fresh walker over the live tree, quarantine pruned.
    #[must_use]
    pub fn walker(&self) -> TreeWalker<'_> {
        TreeWalker::new(&self.root, &self.checker)
    }
}

/// Outcome of a complete run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Root directory that was processed
    pub root: PathBuf,
    /// Quarantine directory
    pub quarantine: PathBuf,
    /// Pass 1 results
    pub dedupe: DedupeReport,
    /// Pass 2 results
    pub flatten: FlattenReport,
    /// Pass 3 results
    pub prune: PruneReport,
}

impl RunSummary {
    /// Total per-file failures across all passes.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.dedupe.failure_count() + self.flatten.failure_count()
    }

    /// `true` if the run moved or removed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.dedupe.duplicates.is_empty()
            && self.flatten.moved.is_empty()
            && self.prune.removed.is_empty()
    }
}

/// A validated pipeline ready to run against one root.
#[derive(Debug)]
pub struct Pipeline {
    layout: TreeLayout,
    config: PipelineConfig,
}

impl Pipeline {
    /// Validate `root` and prepare a pipeline for it.
    ///
    /// The root is made absolute and canonicalized, so a root given through a
    /// symlink is processed at its real location.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidRoot`] if `root` is not a directory.
    pub fn new(root: &Path, config: PipelineConfig) -> Result<Self, PipelineError> {
        let absolute = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        if !absolute.is_dir() {
            return Err(PipelineError::InvalidRoot(absolute));
        }
        let root = fs::canonicalize(&absolute).map_err(|_| PipelineError::InvalidRoot(absolute))?;

        let layout = TreeLayout::new(&root, &config.quarantine_name);
        Ok(Self { layout, config })
    }

    /// Root and quarantine locations.
    #[must_use]
    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Create the quarantine directory if needed.
    fn ensure_quarantine(&self) -> Result<(), PipelineError> {
        let path = self.layout.quarantine();
        fs::create_dir_all(path).map_err(|source| PipelineError::Quarantine {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Quarantine directory ready: {}", path.display());
        Ok(())
    }

    /// Run all three passes.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Quarantine`] if the quarantine directory
    /// cannot be created. Per-file failures are reported in the summary.
    pub fn run(&self, observer: &dyn PipelineObserver) -> Result<RunSummary, PipelineError> {
        self.ensure_quarantine()?;

        let dedupe = Deduplicator::new(&self.layout, &self.config).run(observer);
        let flatten = Flattener::new(&self.layout, &self.config).run(observer);
        let prune = Pruner::new(&self.layout).run(observer);

        log::info!(
            "Run complete: {} duplicates, {} files flattened, {} folders removed, {} failures",
            dedupe.duplicates.len(),
            flatten.moved.len(),
            prune.removed.len(),
            dedupe.failure_count() + flatten.failure_count()
        );

        Ok(RunSummary {
            root: self.layout.root().to_path_buf(),
            quarantine: self.layout.quarantine().to_path_buf(),
            dedupe,
            flatten,
            prune,
        })
    }
}
