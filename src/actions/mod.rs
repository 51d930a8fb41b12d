//! Filesystem actions module.
//!
//! This module provides functionality for:
//! - Choosing collision-free target names
//! - Moving whole files without ever overwriting
//!
//! # Naming
//!
//! ```no_run
//! use flatdupe::actions::{unique_target_path, MAX_NAME_ATTEMPTS};
//! use std::ffi::OsStr;
//! use std::path::Path;
//!
//! let target = unique_target_path(Path::new("/data"), OsStr::new("a.txt"), "", MAX_NAME_ATTEMPTS);
//! ```
//!
//! # Moving
//!
//! ```no_run
//! use flatdupe::actions::move_file;
//! use std::path::Path;
//!
//! let result = move_file(Path::new("/data/x/a.txt"), Path::new("/data/a.txt"));
//! ```

pub mod naming;
pub mod relocate;

// Re-export commonly used types
pub use naming::{split_file_name, unique_target_path, NamingError, MAX_NAME_ATTEMPTS};
pub use relocate::{move_file, MoveError};
