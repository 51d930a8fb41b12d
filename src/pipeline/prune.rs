//! Pass 3: remove empty directories.
//!
//! Directories are visited deepest first, so removing a child can empty its
//! parent in the same pass. Emptiness is checked against the live directory
//! at visit time. Removal is best effort: a directory that is still occupied
//! or protected is left alone without being reported as a failure.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{Event, Phase, PipelineObserver, TreeLayout};

/// Results of the prune pass.
#[derive(Debug, Clone, Default)]
pub struct PruneReport {
    /// Directories removed, in removal order.
    pub removed: Vec<PathBuf>,
    /// Directories that were left in place (non-empty or not removable).
    pub kept: usize,
}

/// Pass 3 worker.
#[derive(Debug)]
pub struct Pruner<'a> {
    layout: &'a TreeLayout,
}

impl<'a> Pruner<'a> {
    /// Create a pruner.
    #[must_use]
    pub fn new(layout: &'a TreeLayout) -> Self {
        Self { layout }
    }

    /// Run the pass to completion.
    pub fn run(&self, observer: &dyn PipelineObserver) -> PruneReport {
        let mut report = PruneReport::default();
        observer.on_phase_start(Phase::Prune);

        let directories = self.layout.walker().directories();
        for entry in directories.into_iter().rev() {
            let dir = match entry {
                Ok(dir) => dir,
                Err(e) => {
                    log::trace!("Prune: skipping unreadable entry: {}", e);
                    continue;
                }
            };
            observer.on_item(Phase::Prune, &dir);

            if dir == self.layout.root() || self.layout.in_quarantine(&dir) {
                continue;
            }

            match try_remove_empty(&dir) {
                Ok(true) => {
                    observer.on_event(&Event::DirRemoved { path: dir.clone() });
                    report.removed.push(dir);
                }
                Ok(false) => report.kept += 1,
                Err(e) => {
                    log::trace!("Prune: could not remove {}: {}", dir.display(), e);
                    report.kept += 1;
                }
            }
        }

        log::debug!(
            "Prune pass: {} removed, {} kept",
            report.removed.len(),
            report.kept
        );
        observer.on_phase_end(Phase::Prune);
        report
    }
}

/// Remove `dir` if it has no entries. Returns whether it was removed.
fn try_remove_empty(dir: &Path) -> io::Result<bool> {
    if fs::read_dir(dir)?.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(dir)?;
    Ok(true)
}
