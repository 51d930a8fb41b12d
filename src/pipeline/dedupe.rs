//! Pass 1: content deduplication.
//!
//! # Algorithm
//!
//! Walk the root (quarantine pruned) and hash every regular file. The first
//! file seen with a given digest stays where it is; flattening happens in
//! the next pass. Every later file with the same digest is moved into the
//! quarantine directory as `<stem>_dup<ext>` (numbered if taken).
//!
//! The digest map lives in the [`Deduplicator`] and is dropped with it when
//! the pass ends.
//!
//! # Survivor choice
//!
//! Among identical files, the survivor is the first one in traversal order,
//! which is depth-first and sorted by file name within each directory. That
//! makes the choice repeatable for a given tree, but it says nothing about
//! which copy is "better".

use std::collections::HashMap;
use std::path::PathBuf;

use super::{Event, Phase, PipelineConfig, PipelineObserver, TreeLayout};
use crate::actions::{move_file, unique_target_path};
use crate::scanner::{hash_to_hex, FileEntry, Hash, Hasher};

/// Results of the deduplication pass.
#[derive(Debug, Clone, Default)]
pub struct DedupeReport {
    /// Files hashed successfully.
    pub files_hashed: usize,
    /// Distinct contents seen (files left in place as originals).
    pub unique_files: usize,
    /// Duplicates moved to quarantine as `(old path, quarantine path)`.
    pub duplicates: Vec<(PathBuf, PathBuf)>,
    /// Total size of the duplicates moved.
    pub bytes_quarantined: u64,
    /// Files found inside quarantine and skipped.
    pub skipped_in_quarantine: usize,
    /// Files that could not be hashed.
    pub read_failures: Vec<(PathBuf, String)>,
    /// Duplicates that could not be moved (name exhaustion included).
    pub move_failures: Vec<(PathBuf, String)>,
    /// Entries the traversal could not read.
    pub scan_failures: Vec<(PathBuf, String)>,
}

impl DedupeReport {
    /// Number of per-file failures in this pass.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.read_failures.len() + self.move_failures.len() + self.scan_failures.len()
    }
}

/// Pass 1 worker. Owns the digest map for the duration of the pass.
#[derive(Debug)]
pub struct Deduplicator<'a> {
    layout: &'a TreeLayout,
    config: &'a PipelineConfig,
    hasher: Hasher,
    seen: HashMap<Hash, PathBuf>,
}

impl<'a> Deduplicator<'a> {
    /// Create a deduplicator with an empty digest map.
    #[must_use]
    pub fn new(layout: &'a TreeLayout, config: &'a PipelineConfig) -> Self {
        Self {
            layout,
            config,
            hasher: config.hasher(),
            seen: HashMap::new(),
        }
    }

    /// Run the pass to completion. Consumes the deduplicator, and with it the
    /// digest map.
    pub fn run(mut self, observer: &dyn PipelineObserver) -> DedupeReport {
        let mut report = DedupeReport::default();
        observer.on_phase_start(Phase::Deduplicate);

        let layout = self.layout;
        for entry in layout.walker().files() {
            match entry {
                Ok(file) => self.process_file(&file, observer, &mut report),
                Err(e) => {
                    let path = e.path().to_path_buf();
                    observer.on_event(&Event::ScanFailed {
                        phase: Phase::Deduplicate,
                        path: path.clone(),
                        error: e.to_string(),
                    });
                    report.scan_failures.push((path, e.to_string()));
                }
            }
        }

        log::debug!(
            "Deduplicate pass: {} hashed, {} unique, {} quarantined",
            report.files_hashed,
            report.unique_files,
            report.duplicates.len()
        );
        observer.on_phase_end(Phase::Deduplicate);
        report
    }

    fn process_file(
        &mut self,
        file: &FileEntry,
        observer: &dyn PipelineObserver,
        report: &mut DedupeReport,
    ) {
        observer.on_item(Phase::Deduplicate, &file.path);

        // The walk already prunes quarantine; this guards against anything
        // that resolves into it through another route.
        if self.layout.in_quarantine(&file.path) {
            log::debug!("Skipping file inside quarantine: {}", file.path.display());
            report.skipped_in_quarantine += 1;
            observer.on_event(&Event::QuarantineSkipped {
                path: file.path.clone(),
            });
            return;
        }

        let digest = match self.hasher.hash_file(&file.path) {
            Ok(digest) => digest,
            Err(e) => {
                observer.on_event(&Event::ReadFailed {
                    path: file.path.clone(),
                    error: e.to_string(),
                });
                report.read_failures.push((file.path.clone(), e.to_string()));
                return;
            }
        };
        report.files_hashed += 1;
        log::debug!("{}  {}", hash_to_hex(&digest), file.path.display());

        match self.seen.get(&digest) {
            Some(original) => {
                let original = original.clone();
                self.quarantine(file, original, observer, report);
            }
            None => {
                self.seen.insert(digest, file.path.clone());
                report.unique_files += 1;
            }
        }
    }

    /// Move a duplicate into quarantine.
    fn quarantine(
        &self,
        file: &FileEntry,
        original: PathBuf,
        observer: &dyn PipelineObserver,
        report: &mut DedupeReport,
    ) {
        let Some(name) = file.path.file_name() else {
            return;
        };

        let target = match unique_target_path(
            self.layout.quarantine(),
            name,
            &self.config.duplicate_suffix,
            self.config.max_name_attempts,
        ) {
            Ok(target) => target,
            Err(e) => {
                observer.on_event(&Event::NameExhausted {
                    phase: Phase::Deduplicate,
                    path: file.path.clone(),
                    error: e.to_string(),
                });
                report.move_failures.push((file.path.clone(), e.to_string()));
                return;
            }
        };

        match move_file(&file.path, &target) {
            Ok(()) => {
                observer.on_event(&Event::Duplicate {
                    path: file.path.clone(),
                    original,
                    target: target.clone(),
                });
                report.bytes_quarantined += file.size;
                report.duplicates.push((file.path.clone(), target));
            }
            Err(e) => {
                observer.on_event(&Event::MoveFailed {
                    phase: Phase::Deduplicate,
                    path: file.path.clone(),
                    error: e.to_string(),
                });
                report.move_failures.push((file.path.clone(), e.to_string()));
            }
        }
    }
}
