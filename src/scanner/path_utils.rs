//! Path resolution and containment checks.
//!
//! Every "is this under the quarantine directory?" decision in the pipeline
//! goes through [`ContainmentChecker`], so all three passes agree on what
//! counts as inside, regardless of `.`/`..` segments, trailing separators or
//! symlinked path components.
//!
//! # Example
//!
//! ```
//! use flatdupe::scanner::path_utils::ContainmentChecker;
//! use std::path::Path;
//!
//! assert!(ContainmentChecker::new(Path::new("/srv/data/_duplicates")).contains(Path::new("/srv/data/_duplicates/a.txt")));
//! assert!(ContainmentChecker::new(Path::new("/srv/data/_duplicates/")).contains(Path::new("/srv/data/x/../_duplicates")));
//! assert!(!ContainmentChecker::new(Path::new("/srv/data/_duplicates")).contains(Path::new("/srv/data/_duplicates_old")));
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Remove `.` and `..` segments without touching the filesystem.
///
/// The path is made absolute against the current directory first. A `..`
/// at the filesystem root stays at the root.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve `path` to an absolute form with symlinks expanded where possible.
///
/// The deepest existing ancestor is canonicalized and any remaining,
/// not-yet-existing components are appended to it. This lets paths that are
/// about to be created compare equal to their canonical siblings.
#[must_use]
pub fn resolve(path: &Path) -> PathBuf {
    let normalized = normalize_lexically(path);

    let mut tail: Vec<OsString> = Vec::new();
    let mut cursor = normalized.as_path();
    loop {
        if let Ok(canonical) = fs::canonicalize(cursor) {
            let mut resolved = canonical;
            resolved.extend(tail.iter().rev());
            return resolved;
        }
        match (cursor.parent(), cursor.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                cursor = parent;
            }
            _ => return normalized,
        }
    }
}

/// Decides whether paths lie inside a fixed boundary directory.
///
/// The boundary is resolved once at construction; candidates are resolved
/// per call because the tree changes while the pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainmentChecker {
    boundary: PathBuf,
}

impl ContainmentChecker {
    /// Create a checker for `boundary`.
    #[must_use]
    pub fn new(boundary: &Path) -> Self {
        Self {
            boundary: resolve(boundary),
        }
    }

    /// `true` if `path` is the boundary itself or nested anywhere below it.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        resolve(path).starts_with(&self.boundary)
    }
}
