//! Pipeline phases, events and the observer seam.
//!
//! Passes never print. They describe what happened as [`Event`] values and
//! hand them to a [`PipelineObserver`], which decides how (or whether) to
//! show them. The console front end lives in `output::console`; tests use
//! `()` or a recording observer.

use std::fmt;
use std::path::{Path, PathBuf};

/// One of the three sequential passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Pass 1: move repeated content to quarantine
    Deduplicate,
    /// Pass 2: move remaining nested files into the root
    Flatten,
    /// Pass 3: remove directories left empty
    Prune,
}

impl Phase {
    /// 1-based position in the pipeline.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Deduplicate => 1,
            Self::Flatten => 2,
            Self::Prune => 3,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deduplicate => write!(f, "deduplicate"),
            Self::Flatten => write!(f, "flatten"),
            Self::Prune => write!(f, "prune"),
        }
    }
}

/// Something a pass did or failed to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The traversal itself could not read an entry.
    ScanFailed {
        /// Pass that was walking
        phase: Phase,
        /// Entry that failed
        path: PathBuf,
        /// Error text
        error: String,
    },
    /// A file could not be hashed and was left where it is.
    ReadFailed {
        /// Unreadable file
        path: PathBuf,
        /// Error text
        error: String,
    },
    /// A candidate turned out to live in quarantine and was skipped.
    QuarantineSkipped {
        /// Skipped file
        path: PathBuf,
    },
    /// A duplicate was moved to quarantine.
    Duplicate {
        /// Where the duplicate was
        path: PathBuf,
        /// The first file seen with the same content
        original: PathBuf,
        /// Where it is now
        target: PathBuf,
    },
    /// A file was moved into the root.
    Moved {
        /// Previous location
        from: PathBuf,
        /// New location
        to: PathBuf,
    },
    /// A move (to quarantine or to the root) failed; the file stayed put.
    MoveFailed {
        /// Pass attempting the move
        phase: Phase,
        /// File that stayed put
        path: PathBuf,
        /// Error text
        error: String,
    },
    /// No free target name was found; the move was abandoned.
    NameExhausted {
        /// Pass attempting the move
        phase: Phase,
        /// File that stayed put
        path: PathBuf,
        /// Error text
        error: String,
    },
    /// An empty directory was removed.
    DirRemoved {
        /// Removed directory
        path: PathBuf,
    },
}

impl Event {
    /// `true` for events describing a per-file failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::ScanFailed { .. }
                | Self::ReadFailed { .. }
                | Self::MoveFailed { .. }
                | Self::NameExhausted { .. }
        )
    }
}

/// Receives progress and events while the pipeline runs.
///
/// Every method has a no-op default so observers only implement what they
/// care about.
pub trait PipelineObserver {
    /// Called when a pass starts.
    fn on_phase_start(&self, _phase: Phase) {}

    /// Called for each file or directory a pass is about to handle.
    fn on_item(&self, _phase: Phase, _path: &Path) {}

    /// Called for each outcome worth reporting.
    fn on_event(&self, _event: &Event) {}

    /// Called when a pass completes.
    fn on_phase_end(&self, _phase: Phase) {}
}

/// Silent observer.
impl PipelineObserver for () {}
