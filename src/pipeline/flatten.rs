//! Pass 2: flatten nested files into the root.
//!
//! Purely structural: content is never read. Every regular file below the
//! root (outside quarantine) moves to `root/<name>`, or to the next free
//! `<stem>_<n><ext>` if that name is taken. Two different files that share a
//! name therefore both survive.

use std::path::PathBuf;

use super::{Event, Phase, PipelineConfig, PipelineObserver, TreeLayout};
use crate::actions::{move_file, unique_target_path};
use crate::scanner::FileEntry;

/// Results of the flatten pass.
#[derive(Debug, Clone, Default)]
pub struct FlattenReport {
    /// Files moved into the root as `(old path, new path)`.
    pub moved: Vec<(PathBuf, PathBuf)>,
    /// Files that were already directly in the root.
    pub already_in_root: usize,
    /// Files found inside quarantine and skipped.
    pub skipped_in_quarantine: usize,
    /// Files that could not be moved (name exhaustion included).
    pub failures: Vec<(PathBuf, String)>,
    /// Entries the traversal could not read.
    pub scan_failures: Vec<(PathBuf, String)>,
}

impl FlattenReport {
    /// Number of per-file failures in this pass.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len() + self.scan_failures.len()
    }
}

/// Pass 2 worker.
#[derive(Debug)]
pub struct Flattener<'a> {
    layout: &'a TreeLayout,
    config: &'a PipelineConfig,
}

impl<'a> Flattener<'a> {
    /// Create a flattener.
    #[must_use]
    pub fn new(layout: &'a TreeLayout, config: &'a PipelineConfig) -> Self {
        Self { layout, config }
    }

    /// Run the pass to completion.
    pub fn run(&self, observer: &dyn PipelineObserver) -> FlattenReport {
        let mut report = FlattenReport::default();
        observer.on_phase_start(Phase::Flatten);

        // Sorted listings are read whole per directory, so files landing in
        // the root during this loop are not visited again.
        for entry in self.layout.walker().files() {
            match entry {
                Ok(file) => self.process_file(&file, observer, &mut report),
                Err(e) => {
                    let path = e.path().to_path_buf();
                    observer.on_event(&Event::ScanFailed {
                        phase: Phase::Flatten,
                        path: path.clone(),
                        error: e.to_string(),
                    });
                    report.scan_failures.push((path, e.to_string()));
                }
            }
        }

        log::debug!(
            "Flatten pass: {} moved, {} already in root, {} failed",
            report.moved.len(),
            report.already_in_root,
            report.failures.len()
        );
        observer.on_phase_end(Phase::Flatten);
        report
    }

    fn process_file(
        &self,
        file: &FileEntry,
        observer: &dyn PipelineObserver,
        report: &mut FlattenReport,
    ) {
        let root = self.layout.root();
        observer.on_item(Phase::Flatten, &file.path);

        if self.layout.in_quarantine(&file.path) {
            log::debug!("Skipping file inside quarantine: {}", file.path.display());
            report.skipped_in_quarantine += 1;
            observer.on_event(&Event::QuarantineSkipped {
                path: file.path.clone(),
            });
            return;
        }

        if file.depth == 1 {
            report.already_in_root += 1;
            return;
        }

        let Some(name) = file.path.file_name() else {
            return;
        };

        let mut target = root.join(name);
        if target == file.path {
            report.already_in_root += 1;
            return;
        }

        if target.symlink_metadata().is_ok() {
            target = match unique_target_path(root, name, "", self.config.max_name_attempts) {
                Ok(target) => target,
                Err(e) => {
                    observer.on_event(&Event::NameExhausted {
                        phase: Phase::Flatten,
                        path: file.path.clone(),
                        error: e.to_string(),
                    });
                    report.failures.push((file.path.clone(), e.to_string()));
                    return;
                }
            };
        }

        match move_file(&file.path, &target) {
            Ok(()) => {
                observer.on_event(&Event::Moved {
                    from: file.path.clone(),
                    to: target.clone(),
                });
                report.moved.push((file.path.clone(), target));
            }
            Err(e) => {
                observer.on_event(&Event::MoveFailed {
                    phase: Phase::Flatten,
                    path: file.path.clone(),
                    error: e.to_string(),
                });
                report.failures.push((file.path.clone(), e.to_string()));
            }
        }
    }
}
