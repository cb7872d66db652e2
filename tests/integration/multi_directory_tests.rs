use dupscan::actions::ScriptedConfirmer;
use dupscan::config::Settings;
use dupscan::duplicates::DuplicateFinder;
use dupscan::run_scan;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_duplicates_across_roots() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    fs::write(first.path().join("photo.jpg"), b"pixels").unwrap();
    fs::write(second.path().join("copy.jpg"), b"pixels").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
    let (groups, summary) = finder.find_duplicates(&roots).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths(),
        vec![first.path().join("photo.jpg"), second.path().join("copy.jpg")]
    );
}

#[test]
fn test_root_order_decides_kept_file() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    fs::write(first.path().join("x"), b"data").unwrap();
    fs::write(second.path().join("x"), b"data").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder
        .find_duplicates(&[second.path().to_path_buf(), first.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups[0].keeper().unwrap().path, second.path().join("x"));
}

#[test]
fn test_overlapping_roots_report_both_occurrences() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("file"), b"lonely").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(&[dir.path().to_path_buf(), sub.clone()])
        .unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths(), vec![sub.join("file"), sub.join("file")]);
}

#[test]
fn test_overlapping_roots_never_delete_the_only_copy() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("file"), b"lonely").unwrap();

    let settings = Settings {
        directory_paths: vec![dir.path().to_path_buf(), sub.clone()],
        delete_duplicates: true,
        ..Settings::default()
    };
    let mut confirmer = ScriptedConfirmer::new(true);
    let mut out = Vec::new();
    run_scan(&settings, &mut confirmer, &mut out, None, false).unwrap();

    assert!(sub.join("file").exists());
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Same file as the kept copy, skipped."));
    assert!(!out.contains("Deleting duplicate."));
}

#[test]
fn test_missing_root_fails_the_run() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"1").unwrap();

    let settings = Settings {
        directory_paths: vec![dir.path().to_path_buf(), dir.path().join("missing")],
        ..Settings::default()
    };
    let mut confirmer = ScriptedConfirmer::new(false);
    let mut out = Vec::new();
    let err = run_scan(&settings, &mut confirmer, &mut out, None, false).unwrap_err();

    assert!(err.to_string().contains("missing"), "{err:#}");
    assert!(out.is_empty());
}
