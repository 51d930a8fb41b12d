//! Console observer for pipeline runs.

use std::fmt::Display;
use std::path::Path;

use bytesize::ByteSize;
use yansi::Paint;

use crate::pipeline::{Event, Phase, PipelineObserver, RunSummary, TreeLayout};
use crate::progress::Progress;
use crate::scanner::HashAlgorithm;

/// Prints pipeline progress to stdout.
///
/// In quiet mode only failures and the final summary are printed.
pub struct ConsoleReporter {
    quiet: bool,
    algorithm: HashAlgorithm,
    progress: Progress,
}

impl ConsoleReporter {
    /// Create a reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - Suppress per-file announcements and headings
    /// * `show_progress` - Draw a spinner on stderr when it is a terminal
    /// * `algorithm` - Digest algorithm, named in the first heading
    #[must_use]
    pub fn new(quiet: bool, show_progress: bool, algorithm: HashAlgorithm) -> Self {
        Self {
            quiet,
            algorithm,
            progress: Progress::new(show_progress && !quiet),
        }
    }

    fn line(&self, text: impl Display) {
        self.progress.suspend(|| println!("{text}"));
    }

    /// Print the root and quarantine locations.
    pub fn print_header(&self, layout: &TreeLayout) {
        if self.quiet {
            return;
        }
        self.line(format_args!("Root folder: {}", layout.root().display()));
        self.line(format_args!(
            "Duplicates folder: {}\n",
            layout.quarantine().display()
        ));
    }

    /// Print the closing summary. Printed even in quiet mode.
    pub fn print_summary(&self, summary: &RunSummary) {
        for line in summary_lines(summary) {
            self.line(line);
        }
    }
}

impl PipelineObserver for ConsoleReporter {
    fn on_phase_start(&self, phase: Phase) {
        if !self.quiet {
            self.line(phase_title(phase, self.algorithm).bold());
        }
        self.progress.start_phase(phase);
    }

    fn on_item(&self, _phase: Phase, path: &Path) {
        self.progress.tick(path);
    }

    fn on_event(&self, event: &Event) {
        if self.quiet && !event.is_failure() {
            return;
        }
        if let Some(text) = format_event(event) {
            self.line(text);
        }
    }

    fn on_phase_end(&self, _phase: Phase) {
        self.progress.finish_phase();
    }
}

/// Heading printed when a pass starts.
#[must_use]
pub fn phase_title(phase: Phase, algorithm: HashAlgorithm) -> String {
    match phase {
        Phase::Deduplicate => {
            format!("1) Scanning for duplicates by file content ({algorithm})...")
        }
        Phase::Flatten => "\n2) Flattening: moving remaining files into root folder...".to_string(),
        Phase::Prune => "\n3) Removing empty folders...".to_string(),
    }
}

/// Render one event, or `None` for events that are only logged.
#[must_use]
pub fn format_event(event: &Event) -> Option<String> {
    let text = match event {
        Event::Duplicate { path, target, .. } => format!(
            "  {}\n    {}\n    -> {}",
            "DUPLICATE:".yellow().bold(),
            path.display(),
            target.display()
        ),
        Event::Moved { from, to } => format!(
            "  {}\n    {}\n    -> {}",
            "MOVE:".cyan().bold(),
            from.display(),
            to.display()
        ),
        Event::DirRemoved { path } => format!("  {} {}", "RMDIR:".blue(), path.display()),
        Event::ReadFailed { path, error } => format!(
            "  {} Could not read: {} ({})",
            "[SKIP]".magenta().bold(),
            path.display(),
            error
        ),
        Event::ScanFailed { path, error, .. } => format!(
            "  {} Could not scan: {} ({})",
            "[SKIP]".magenta().bold(),
            path.display(),
            error
        ),
        Event::MoveFailed { phase, path, error } => {
            let what = match phase {
                Phase::Deduplicate => "Could not move duplicate",
                _ => "Could not move",
            };
            format!(
                "  {} {}: {} ({})",
                "[ERROR]".red().bold(),
                what,
                path.display(),
                error
            )
        }
        Event::NameExhausted { path, error, .. } => format!(
            "  {} No free name for: {} ({})",
            "[ERROR]".red().bold(),
            path.display(),
            error
        ),
        Event::QuarantineSkipped { .. } => return None,
    };
    Some(text)
}

/// Closing summary lines.
#[must_use]
pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![
        format!("\n{}", "Done.".green().bold()),
        format!("- Unique files are in: {}", summary.root.display()),
        format!("- Duplicates were moved to: {}", summary.quarantine.display()),
        format!(
            "- {} duplicate(s) quarantined ({}), {} file(s) flattened, {} folder(s) removed",
            summary.dedupe.duplicates.len(),
            ByteSize::b(summary.dedupe.bytes_quarantined),
            summary.flatten.moved.len(),
            summary.prune.removed.len()
        ),
    ];

    let failures = summary.failure_count();
    if failures > 0 {
        lines.push(format!(
            "- {} {} could not be processed; see the [SKIP]/[ERROR] lines above",
            failures.yellow().bold(),
            if failures == 1 { "file" } else { "files" }
        ));
    }

    let folder = summary
        .quarantine
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    lines.push(format!(
        "If everything looks correct, you can delete the {folder} folder manually."
    ));
    lines
}
