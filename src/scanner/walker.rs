//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! [`TreeWalker`] traverses a root directory depth-first in lexicographic
//! file-name order, never following symbolic links. A [`ContainmentChecker`]
//! marks a subtree (the quarantine directory) that is pruned from the walk:
//! it is not descended into at all, rather than listed and filtered.
//!
//! The walk reads live filesystem state. Each pass of the pipeline creates its
//! own walker, so it sees the tree as the previous pass left it.
//!
//! # Ordering
//!
//! Entries within one directory are sorted by file name, which pins the
//! traversal for a given tree. Which of several identical files counts as
//! the original is therefore deterministic, but it is a consequence of this
//! ordering and not of anything about the files themselves.
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::scanner::{ContainmentChecker, TreeWalker};
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let exclude = ContainmentChecker::new(&root.join("_duplicates"));
//! let walker = TreeWalker::new(root, &exclude);
//! let files: Vec<_> = walker.files().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{ContainmentChecker, FileEntry, ScanError};

/// Sorted, single-threaded directory walker with an excluded subtree.
#[derive(Debug)]
pub struct TreeWalker<'a> {
    /// Root path to walk
    root: PathBuf,
    /// Subtree that is never entered
    exclude: &'a ContainmentChecker,
}

impl<'a> TreeWalker<'a> {
    /// Create a new walker for `root`, skipping everything `exclude` contains.
    #[must_use]
    pub fn new(root: &Path, exclude: &'a ContainmentChecker) -> Self {
        Self {
            root: root.to_path_buf(),
            exclude,
        }
    }

    /// Build the underlying walkdir iterator with the excluded subtree pruned.
    fn entries(&self) -> impl Iterator<Item = walkdir::Result<DirEntry>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let excluded = self.exclude.contains(entry.path());
                if excluded {
                    log::trace!("Not descending into {}", entry.path().display());
                }
                !excluded
            })
    }

    /// Walk the tree, yielding every regular file outside the excluded subtree.
    ///
    /// Symbolic links and special files are skipped. Errors are yielded as
    /// [`ScanError`] values rather than stopping iteration.
    pub fn files(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        self.entries().filter_map(move |entry_result| match entry_result {
            Ok(entry) => self.process_entry(&entry),
            Err(e) => Some(Err(self.handle_walk_error(e))),
        })
    }

    /// Collect every directory below the root, parents before children.
    ///
    /// The root itself and the excluded subtree are not included. Reversing
    /// the result gives a deepest-first order.
    #[must_use]
    pub fn directories(&self) -> Vec<Result<PathBuf, ScanError>> {
        self.entries()
            .filter_map(|entry_result| match entry_result {
                Ok(entry) if entry.depth() > 0 && entry.file_type().is_dir() => {
                    Some(Ok(entry.into_path()))
                }
                Ok(_) => None,
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
            .collect()
    }

    /// Turn a walkdir entry into a [`FileEntry`] if it is a regular file.
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }
        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", entry.path().display());
            return None;
        }

        match entry.metadata() {
            Ok(metadata) => Some(Ok(FileEntry::new(
                entry.path().to_path_buf(),
                metadata.len(),
                entry.depth(),
            ))),
            Err(e) => Some(Err(self.handle_walk_error(e))),
        }
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            Some(ErrorKind::NotFound) => {
                log::debug!("Path not found (may have been moved): {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                let source = error
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                ScanError::Io { path, source }
            }
        }
    }
}
