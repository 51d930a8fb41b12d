//! Whole-file moves.
//!
//! # Overview
//!
//! [`move_file`] relocates one file:
//! - Never overwrites an existing target
//! - Uses a single `rename` when source and target share a filesystem
//! - Falls back to copy-then-remove across devices
//!
//! A failed move leaves the file at its source path. When the fallback copy
//! succeeds but the source cannot be removed, the copy is deleted again so
//! the file never ends up in two places.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for move operations.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Source file was not found (may have been moved or deleted).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied on the source or target.
    #[error("permission denied moving {from} to {to}")]
    PermissionDenied {
        /// Source path
        from: PathBuf,
        /// Target path
        to: PathBuf,
    },

    /// Something already exists at the target path.
    #[error("target already exists: {0}")]
    TargetExists(PathBuf),

    /// General I/O error.
    #[error("I/O error moving {from} to {to}: {source}")]
    Io {
        /// Source path
        from: PathBuf,
        /// Target path
        to: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl MoveError {
    fn from_io(from: &Path, to: &Path, error: io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound if from.symlink_metadata().is_err() => {
                Self::NotFound(from.to_path_buf())
            }
            ErrorKind::PermissionDenied => Self::PermissionDenied {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
            },
            _ => Self::Io {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Move the file at `from` to `to`.
///
/// # Errors
///
/// Returns a [`MoveError`] if the target exists, the source vanished, or the
/// filesystem refuses the operation. The source is left in place on error.
pub fn move_file(from: &Path, to: &Path) -> Result<(), MoveError> {
    if to.symlink_metadata().is_ok() {
        return Err(MoveError::TargetExists(to.to_path_buf()));
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            log::debug!(
                "Rename crosses devices, copying instead: {} -> {}",
                from.display(),
                to.display()
            );
            copy_then_remove(from, to)
        }
        Err(e) => Err(MoveError::from_io(from, to, e)),
    }
}

/// Copy `from` to `to`, then remove `from`. Undo the copy if removal fails.
fn copy_then_remove(from: &Path, to: &Path) -> Result<(), MoveError> {
    if let Err(e) = fs::copy(from, to) {
        // A partial copy must not be left behind.
        let _ = fs::remove_file(to);
        return Err(MoveError::from_io(from, to, e));
    }

    if let Err(e) = fs::remove_file(from) {
        if let Err(undo) = fs::remove_file(to) {
            log::warn!(
                "Could not remove copy {} after failed move: {}",
                to.display(),
                undo
            );
        }
        return Err(MoveError::from_io(from, to, e));
    }

    Ok(())
}
