//! Scanner module for directory traversal, hashing and path containment.
//!
//! This module provides functionality for:
//! - Sorted, single-threaded directory walking using walkdir
//! - Streaming content hashing (SHA-256 or BLAKE3)
//! - Containment checks against the quarantine directory
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal that never descends into an excluded subtree
//! - [`hasher`]: Streaming file hashing
//! - [`path_utils`]: Path resolution and the [`ContainmentChecker`]
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::scanner::{ContainmentChecker, TreeWalker};
//! use std::path::Path;
//!
//! let root = Path::new("/data/photos");
//! let quarantine = ContainmentChecker::new(&root.join("_duplicates"));
//!
//! let walker = TreeWalker::new(root, &quarantine);
//! for entry in walker.files() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{hash_to_hex, Hash, HashAlgorithm, Hasher, DEFAULT_BLOCK_SIZE};
pub use path_utils::ContainmentChecker;
pub use walker::TreeWalker;

/// A regular file observed during a traversal.
///
/// Entries are transient: each pass walks the live tree again and builds
/// fresh entries, so nothing here survives from one pass to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file, rooted at the walked directory
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Depth below the walked root (1 = directly inside it)
    pub depth: usize,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, depth: usize) -> Self {
        Self { path, size, depth }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::Io { path: p, .. } => p,
        }
    }
}

/// Errors that can occur during file hashing.
///
/// A hashing failure only affects the file being hashed; callers record it
/// and move on to the next file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while opening or reading `path`.
    pub(crate) fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
