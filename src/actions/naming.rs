//! Collision-free target names.
//!
//! Given a directory and a desired file name, [`unique_target_path`] finds a
//! path in that directory that does not exist yet:
//!
//! 1. `stem + suffix + ext`
//! 2. `stem + suffix + "_1" + ext`, `"_2"`, ... up to the attempt bound
//!
//! The check happens before the move, so it is only collision-free for a
//! single writer.
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::actions::naming::{unique_target_path, MAX_NAME_ATTEMPTS};
//! use std::ffi::OsStr;
//! use std::path::Path;
//!
//! let target = unique_target_path(
//!     Path::new("/data/_duplicates"),
//!     OsStr::new("report.pdf"),
//!     "_dup",
//!     MAX_NAME_ATTEMPTS,
//! )?;
//! // "/data/_duplicates/report_dup.pdf", or "report_dup_1.pdf" if taken
//! # Ok::<(), flatdupe::actions::naming::NamingError>(())
//! ```

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default number of numbered candidates tried before giving up.
pub const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Error type for name generation.
#[derive(Debug, Error)]
pub enum NamingError {
    /// Every candidate up to the bound is already taken.
    #[error("could not find a unique name for {filename} in {dir} after {attempts} tries")]
    Exhausted {
        /// Directory that was searched
        dir: PathBuf,
        /// Requested file name
        filename: String,
        /// Number of numbered candidates tried
        attempts: u32,
    },
}

/// Split a file name into stem and extension (extension includes the dot).
///
/// Follows [`Path::file_stem`]: `a.tar.gz` gives `a.tar` + `.gz`, and a
/// leading-dot name such as `.bashrc` has no extension.
#[must_use]
pub fn split_file_name(filename: &OsStr) -> (OsString, OsString) {
    let path = Path::new(filename);
    let stem = path.file_stem().unwrap_or(filename).to_os_string();
    let ext = match path.extension() {
        Some(ext) => {
            let mut dotted = OsString::from(".");
            dotted.push(ext);
            dotted
        }
        None => OsString::new(),
    };
    (stem, ext)
}

/// Build `stem + suffix [+ "_" + n] + ext`.
fn candidate_name(stem: &OsStr, suffix: &str, counter: Option<u32>, ext: &OsStr) -> OsString {
    let mut name = stem.to_os_string();
    name.push(suffix);
    if let Some(n) = counter {
        name.push(format!("_{n}"));
    }
    name.push(ext);
    name
}

/// Anything at all at `path`, including a dangling symlink, occupies the name.
fn is_occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Return a path in `dir` for `filename` (with `suffix` added to the stem)
/// that does not currently exist.
///
/// # Errors
///
/// Returns [`NamingError::Exhausted`] when the plain candidate and all
/// `max_attempts` numbered candidates are taken.
pub fn unique_target_path(
    dir: &Path,
    filename: &OsStr,
    suffix: &str,
    max_attempts: u32,
) -> Result<PathBuf, NamingError> {
    let (stem, ext) = split_file_name(filename);

    let candidate = dir.join(candidate_name(&stem, suffix, None, &ext));
    if !is_occupied(&candidate) {
        return Ok(candidate);
    }

    for i in 1..=max_attempts {
        let candidate = dir.join(candidate_name(&stem, suffix, Some(i), &ext));
        if !is_occupied(&candidate) {
            return Ok(candidate);
        }
    }

    Err(NamingError::Exhausted {
        dir: dir.to_path_buf(),
        filename: filename.to_string_lossy().into_owned(),
        attempts: max_attempts,
    })
}
