//! Per-file failures: the run reports them and carries on.

use super::helpers::{write, RecordingObserver};
use flatdupe::pipeline::{Event, Phase, Pipeline, PipelineConfig, PipelineObserver};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Deletes the named file the moment a given pass announces it, so the
/// pass finds it gone when it tries to read or move it.
struct VanishingFile {
    phase: Phase,
    name: &'static str,
    inner: RecordingObserver,
}

impl VanishingFile {
    fn new(phase: Phase, name: &'static str) -> Self {
        Self {
            phase,
            name,
            inner: RecordingObserver::default(),
        }
    }
}

impl PipelineObserver for VanishingFile {
    fn on_phase_start(&self, phase: Phase) {
        self.inner.on_phase_start(phase);
    }

    fn on_item(&self, phase: Phase, path: &Path) {
        if phase == self.phase && path.file_name().is_some_and(|n| n == self.name) {
            fs::remove_file(path).unwrap();
        }
        self.inner.on_item(phase, path);
    }

    fn on_event(&self, event: &Event) {
        self.inner.on_event(event);
    }

    fn on_phase_end(&self, phase: Phase) {
        self.inner.on_phase_end(phase);
    }
}

#[test]
fn test_read_failure_is_reported_and_run_completes() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "sub/gone.bin", b"payload");
    write(root, "sub/kept.txt", b"kept");
    write(root, "other/kept-too.txt", b"kept too");

    let observer = VanishingFile::new(Phase::Deduplicate, "gone.bin");
    let summary = Pipeline::new(root, PipelineConfig::default())
        .unwrap()
        .run(&observer)
        .unwrap();

    assert_eq!(summary.dedupe.read_failures.len(), 1);
    assert!(summary.dedupe.read_failures[0].0.ends_with("sub/gone.bin"));
    assert_eq!(summary.dedupe.files_hashed, 2);
    assert_eq!(summary.failure_count(), 1);

    // The other passes still ran.
    assert!(root.join("kept.txt").is_file());
    assert!(root.join("kept-too.txt").is_file());
    assert!(!root.join("sub").exists());
    assert!(!root.join("other").exists());

    let events = observer.inner.events.borrow();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::ReadFailed { path, .. } if path.ends_with("sub/gone.bin")
    )));
    assert_eq!(observer.inner.phases.borrow().len(), 6);
}

#[test]
fn test_flatten_move_failure_is_reported_and_run_completes() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "sub/gone.txt", b"gone");
    write(root, "sub/stays.txt", b"stays");

    let observer = VanishingFile::new(Phase::Flatten, "gone.txt");
    let summary = Pipeline::new(root, PipelineConfig::default())
        .unwrap()
        .run(&observer)
        .unwrap();

    assert_eq!(summary.flatten.failures.len(), 1);
    let failed: &PathBuf = &summary.flatten.failures[0].0;
    assert!(failed.ends_with("sub/gone.txt"));
    assert_eq!(summary.flatten.moved.len(), 1);
    assert!(root.join("stays.txt").is_file());
    assert!(!root.join("gone.txt").exists());

    let events = observer.inner.events.borrow();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::MoveFailed {
            phase: Phase::Flatten,
            ..
        }
    )));
}

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[cfg(unix)]
fn set_mode(path: &std::path::Path, mode: u32) {
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(mode);
    fs::set_permissions(path, perms).unwrap();
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped_and_run_completes() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "locked.bin", b"same");
    write(root, "sub/copy.bin", b"same");
    write(root, "sub/other.txt", b"other");
    let locked = root.join("locked.bin");
    set_mode(&locked, 0o000);

    // Privileged users read through mode bits; nothing to test then.
    if fs::read(&locked).is_ok() {
        eprintln!("skipping test_unreadable_file_is_skipped_and_run_completes: running privileged");
        set_mode(&locked, 0o644);
        return;
    }

    let observer = RecordingObserver::default();
    let summary = Pipeline::new(root, PipelineConfig::default())
        .unwrap()
        .run(&observer)
        .unwrap();

    set_mode(&locked, 0o644);

    // Left exactly where it was, content intact.
    assert_eq!(fs::read(&locked).unwrap(), b"same");
    assert_eq!(summary.dedupe.read_failures.len(), 1);
    assert!(summary.dedupe.read_failures[0].0.ends_with("locked.bin"));

    // Passes 2 and 3 still ran around it.
    assert!(root.join("copy.bin").exists());
    assert!(root.join("other.txt").exists());
    assert!(!root.join("sub").exists());
    assert!(summary.dedupe.duplicates.is_empty());

    let events = observer.events.borrow();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::ReadFailed { path, .. } if path.ends_with("locked.bin"))));
    assert_eq!(observer.phases.borrow().len(), 6);
}

#[cfg(unix)]
#[test]
fn test_unmovable_file_stays_and_folder_is_kept() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "a.txt", b"dup");
    write(root, "frozen/a.txt", b"dup");
    write(root, "frozen/unique.txt", b"unique");
    write(root, "loose/b.txt", b"b");
    let frozen = root.join("frozen");
    set_mode(&frozen, 0o555);

    // Privileged users can still unlink from a read-only folder.
    let marker = frozen.join(".marker");
    if fs::write(&marker, b"").is_ok() {
        eprintln!("skipping test_unmovable_file_stays_and_folder_is_kept: running privileged");
        let _ = fs::remove_file(&marker);
        set_mode(&frozen, 0o755);
        return;
    }

    let observer = RecordingObserver::default();
    let summary = Pipeline::new(root, PipelineConfig::default())
        .unwrap()
        .run(&observer)
        .unwrap();

    set_mode(&frozen, 0o755);

    // Duplicate could not be quarantined, unique file could not be flattened.
    assert!(frozen.join("a.txt").exists());
    assert!(frozen.join("unique.txt").exists());
    assert!(summary.dedupe.duplicates.is_empty());
    assert_eq!(summary.dedupe.move_failures.len(), 1);
    assert_eq!(summary.flatten.failures.len(), 2);

    // Everything else still happened; the occupied folder was not pruned.
    assert!(root.join("b.txt").exists());
    assert!(!root.join("loose").exists());
    assert!(frozen.is_dir());

    let events = observer.events.borrow();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::MoveFailed {
            phase: Phase::Deduplicate,
            ..
        }
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        Event::MoveFailed {
            phase: Phase::Flatten,
            ..
        }
    )));
}

#[test]
fn test_flatten_name_exhaustion_is_reported() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "a.txt", b"root");
    write(root, "a_1.txt", b"root one");
    write(root, "sub/a.txt", b"nested");

    let observer = RecordingObserver::default();
    let config = PipelineConfig::default().with_max_name_attempts(1);
    let summary = Pipeline::new(root, config).unwrap().run(&observer).unwrap();

    assert_eq!(summary.flatten.failures.len(), 1);
    assert_eq!(fs::read(root.join("sub/a.txt")).unwrap(), b"nested");
    assert!(root.join("sub").is_dir());
    assert!(observer.events.borrow().iter().any(|e| matches!(
        e,
        Event::NameExhausted {
            phase: Phase::Flatten,
            ..
        }
    )));
}
