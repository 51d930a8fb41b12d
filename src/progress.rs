//! Progress spinner using indicatif.
//!
//! This module provides the [`Progress`] struct, a per-pass spinner drawn on
//! stderr that shows the pass, a running item count and the path being
//! handled. It is only drawn when stderr is a terminal; otherwise every call
//! is a cheap no-op.
//!
//! Lines written to stdout while a spinner is visible must go through
//! [`Progress::suspend`] so they do not tear the spinner line.

use std::cell::RefCell;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::Phase;

/// Spinner for the pass currently running.
pub struct Progress {
    enabled: bool,
    current: RefCell<Option<ProgressBar>>,
}

impl Progress {
    /// Create a progress reporter.
    ///
    /// # Arguments
    ///
    /// * `enabled` - If false, or stderr is not a terminal, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use flatdupe::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// let answer = progress.suspend(|| 42);
    /// assert_eq!(answer, 42);
    /// ```
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: enabled && std::io::stderr().is_terminal(),
            current: RefCell::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix} [{elapsed_precise}] {pos} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    /// Start the spinner for `phase`, replacing any previous one.
    pub fn start_phase(&self, phase: Phase) {
        if !self.enabled {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::style());
        pb.set_prefix(format!("Pass {} ({})", phase.number(), phase));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Some(old) = self.current.replace(Some(pb)) {
            old.finish_and_clear();
        }
    }

    /// Count one item and show its path.
    pub fn tick(&self, path: &Path) {
        if let Some(pb) = self.current.borrow().as_ref() {
            pb.inc(1);
            pb.set_message(truncate_path(&path.to_string_lossy(), 40));
        }
    }

    /// Remove the spinner for the finished pass.
    pub fn finish_phase(&self) {
        if let Some(pb) = self.current.take() {
            pb.finish_and_clear();
        }
    }

    /// Run `f` with the spinner hidden, then redraw it.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        match self.current.borrow().as_ref() {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }
}

/// Truncate a path for display in the spinner line.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let keep: String = file_name
            .chars()
            .skip(name_len.saturating_sub(max_len.saturating_sub(3)))
            .collect();
        return format!("...{keep}");
    }

    format!(".../{file_name}")
}
