use super::helpers::{
    empty_dirs, inside_quarantine, outside_quarantine, snapshot, write, RecordingObserver,
};
use clap::Parser;
use flatdupe::cli::Cli;
use flatdupe::error::ExitCode;
use flatdupe::pipeline::{Event, Phase, Pipeline, PipelineConfig, PipelineError};
use flatdupe::scanner::HashAlgorithm;
use std::collections::BTreeSet;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_identical_content_keeps_exactly_one_copy() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "copy.bin", b"shared payload");
    write(root, "a/copy.bin", b"shared payload");
    write(root, "a/b/other-name.dat", b"shared payload");
    write(root, "c/third.txt", b"shared payload");

    let pipeline = Pipeline::new(root, PipelineConfig::default()).unwrap();
    let summary = pipeline.run(&()).unwrap();

    let snap = snapshot(root);
    let outside = outside_quarantine(&snap);
    let inside = inside_quarantine(&snap);

    assert_eq!(outside.len(), 1);
    assert_eq!(inside.len(), 3);
    assert!(outside.values().all(|v| v == b"shared payload"));
    assert!(inside.values().all(|v| v == b"shared payload"));
    assert_eq!(summary.dedupe.duplicates.len(), 3);
    assert_eq!(summary.dedupe.bytes_quarantined, 3 * 14);
}

#[test]
fn test_distinct_content_all_survives_outside_quarantine() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "one.txt", b"1");
    write(root, "x/two.txt", b"2");
    write(root, "x/y/three.txt", b"3");
    write(root, "z/four.txt", b"4");

    Pipeline::new(root, PipelineConfig::default())
        .unwrap()
        .run(&())
        .unwrap();

    let snap = snapshot(root);
    assert!(inside_quarantine(&snap).is_empty());
    let contents: BTreeSet<Vec<u8>> = outside_quarantine(&snap).into_values().collect();
    let expected: BTreeSet<Vec<u8>> = [b"1", b"2", b"3", b"4"].iter().map(|c| c.to_vec()).collect();
    assert_eq!(contents, expected);
}

#[test]
fn test_name_collision_scenario() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "first/a.txt", b"alpha");
    write(root, "second/a.txt", b"beta");

    Pipeline::new(root, PipelineConfig::default())
        .unwrap()
        .run(&())
        .unwrap();

    let snap = snapshot(root);
    let outside = outside_quarantine(&snap);
    assert_eq!(outside.len(), 2);
    assert_eq!(outside["a.txt"], b"alpha");
    assert_eq!(outside["a_1.txt"], b"beta");
}

#[test]
fn test_duplicate_scenario() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "x/a.txt", b"same bytes");
    write(root, "y/b.txt", b"same bytes");

    Pipeline::new(root, PipelineConfig::default())
        .unwrap()
        .run(&())
        .unwrap();

    let snap = snapshot(root);
    let expected: Vec<&str> = vec!["_duplicates/b_dup.txt", "a.txt"];
    assert_eq!(snap.keys().map(String::as_str).collect::<Vec<_>>(), expected);
    assert_eq!(snap["_duplicates/b_dup.txt"], b"same bytes");
    assert!(!root.join("x").exists());
    assert!(!root.join("y").exists());
}

#[test]
fn test_no_empty_directories_remain() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "deep/er/est/file.txt", b"f");
    write(root, "deep/sibling.txt", b"s");
    fs::create_dir_all(root.join("already/empty/chain")).unwrap();

    Pipeline::new(root, PipelineConfig::default())
        .unwrap()
        .run(&())
        .unwrap();

    assert!(empty_dirs(root).is_empty());
    assert!(root.join("_duplicates").is_dir());
    assert_eq!(outside_quarantine(&snapshot(root)).len(), 2);
}

#[test]
fn test_existing_quarantine_is_left_alone() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "_duplicates/old_dup.txt", b"old");
    write(root, "_duplicates/nested/kept.txt", b"kept");
    write(root, "sub/old.txt", b"old");

    Pipeline::new(root, PipelineConfig::default())
        .unwrap()
        .run(&())
        .unwrap();

    let snap = snapshot(root);
    // Same content as a quarantined file is not a duplicate of it.
    assert_eq!(snap["old.txt"], b"old");
    assert_eq!(snap["_duplicates/old_dup.txt"], b"old");
    assert_eq!(snap["_duplicates/nested/kept.txt"], b"kept");
}

#[test]
fn test_quarantine_collision_numbers_names() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "_duplicates/b_dup.txt", b"earlier run");
    write(root, "a.txt", b"x");
    write(root, "sub/b.txt", b"x");

    Pipeline::new(root, PipelineConfig::default())
        .unwrap()
        .run(&())
        .unwrap();

    let snap = snapshot(root);
    assert_eq!(snap["_duplicates/b_dup.txt"], b"earlier run");
    assert_eq!(snap["_duplicates/b_dup_1.txt"], b"x");
}

#[test]
fn test_observer_sees_phases_in_order() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "x/a.txt", b"dup");
    write(root, "y/b.txt", b"dup");
    write(root, "y/c.txt", b"unique");

    let observer = RecordingObserver::default();
    Pipeline::new(root, PipelineConfig::default())
        .unwrap()
        .run(&observer)
        .unwrap();

    assert_eq!(
        *observer.phases.borrow(),
        vec![
            (Phase::Deduplicate, true),
            (Phase::Deduplicate, false),
            (Phase::Flatten, true),
            (Phase::Flatten, false),
            (Phase::Prune, true),
            (Phase::Prune, false),
        ]
    );

    let events = observer.events.borrow();
    let duplicates = events.iter().filter(|e| matches!(e, Event::Duplicate { .. })).count();
    let moves = events.iter().filter(|e| matches!(e, Event::Moved { .. })).count();
    let removed = events.iter().filter(|e| matches!(e, Event::DirRemoved { .. })).count();
    assert_eq!(duplicates, 1);
    assert_eq!(moves, 2);
    assert_eq!(removed, 2);
    assert!(events.iter().all(|e| !e.is_failure()));
    assert!(*observer.items.borrow() > 0);
}

#[test]
fn test_duplicate_event_names_original() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "x/a.txt", b"dup");
    write(root, "y/b.txt", b"dup");

    let observer = RecordingObserver::default();
    let pipeline = Pipeline::new(root, PipelineConfig::default()).unwrap();
    pipeline.run(&observer).unwrap();

    let events = observer.events.borrow();
    let (path, original, target) = events
        .iter()
        .find_map(|e| match e {
            Event::Duplicate {
                path,
                original,
                target,
            } => Some((path.clone(), original.clone(), target.clone())),
            _ => None,
        })
        .unwrap();
    assert!(path.ends_with("y/b.txt"));
    assert!(original.ends_with("x/a.txt"));
    assert_eq!(target, pipeline.layout().quarantine().join("b_dup.txt"));
}

#[test]
fn test_blake3_gives_same_layout() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "x/a.txt", b"same");
    write(root, "y/b.txt", b"same");
    write(root, "y/c.txt", b"other");

    let config = PipelineConfig::default()
        .with_hash_algorithm(HashAlgorithm::Blake3)
        .with_block_size(3);
    Pipeline::new(root, config).unwrap().run(&()).unwrap();

    let snap = snapshot(root);
    assert_eq!(
        snap.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["_duplicates/b_dup.txt", "a.txt", "c.txt"]
    );
}

#[test]
fn test_relative_segments_in_root_argument() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "inner/a.txt", b"a");
    fs::create_dir(root.join("elsewhere")).unwrap();

    let odd_root = root.join("elsewhere").join("..").join(".");
    let pipeline = Pipeline::new(&odd_root, PipelineConfig::default()).unwrap();
    pipeline.run(&()).unwrap();

    assert_eq!(
        pipeline.layout().root(),
        fs::canonicalize(root).unwrap().as_path()
    );
    assert!(root.join("a.txt").exists());
    assert!(!root.join("elsewhere").exists());
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_left_alone() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "real/data.txt", b"d");
    std::os::unix::fs::symlink(root.join("real/data.txt"), root.join("real/link.txt")).unwrap();

    let summary = Pipeline::new(root, PipelineConfig::default())
        .unwrap()
        .run(&())
        .unwrap();

    assert!(root.join("data.txt").exists());
    assert!(root.join("real/link.txt").symlink_metadata().is_ok());
    assert_eq!(summary.dedupe.files_hashed, 1);
    assert!(summary.dedupe.duplicates.is_empty());
}

#[test]
fn test_run_app_success() {
    let dir = tempdir().unwrap();
    write(dir.path(), "x/a.txt", b"dup");
    write(dir.path(), "y/a.txt", b"dup");

    let cli = Cli::try_parse_from([
        "flatdupe",
        "--no-progress",
        "--no-color",
        "-q",
        dir.path().to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(flatdupe::run_app(cli).unwrap(), ExitCode::Success);
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("_duplicates/a_dup.txt").exists());
}

#[test]
fn test_run_app_invalid_root() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("not-a-dir.txt");
    fs::write(&file, "x").unwrap();

    let cli = Cli::try_parse_from(["flatdupe", "--no-progress", file.to_str().unwrap()]).unwrap();
    let err = flatdupe::run_app(cli).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::InvalidRoot(_))
    ));
    assert_eq!(ExitCode::for_error(&err), ExitCode::InvalidRoot);
    assert!(!dir.path().join("_duplicates").exists());
}
