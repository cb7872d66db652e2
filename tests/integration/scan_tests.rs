use dupscan::actions::ScriptedConfirmer;
use dupscan::config::Settings;
use dupscan::duplicates::{DuplicateFinder, FinderConfig};
use dupscan::error::ExitCode;
use dupscan::output::OutputFormat;
use dupscan::run_scan;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn settings_for(root: &Path) -> Settings {
    Settings {
        directory_paths: vec![root.to_path_buf()],
        ..Settings::default()
    }
}

fn run_to_string(settings: &Settings) -> (ExitCode, String) {
    let mut confirmer = ScriptedConfirmer::new(false);
    let mut out = Vec::new();
    let code = run_scan(settings, &mut confirmer, &mut out, None, false).unwrap();
    assert_eq!(confirmer.asked(), 0);
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(&[dir.path().to_path_buf()]).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.hashed_files, 0);
}

#[test]
fn test_empty_tree_reports_header_only() {
    let dir = tempdir().unwrap();
    let (code, out) = run_to_string(&settings_for(dir.path()));

    assert_eq!(code, ExitCode::Success);
    assert_eq!(
        out,
        format!(
            "Processing files in the following directory(ies): [{:?}]\n",
            dir.path().display().to_string()
        )
    );
}

#[test]
fn test_distinct_sizes_are_never_hashed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one"), b"1").unwrap();
    fs::write(dir.path().join("two"), b"22").unwrap();
    fs::write(dir.path().join("three"), b"333").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(&[dir.path().to_path_buf()]).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.eliminated_by_size, 3);
    assert_eq!(summary.hashed_files, 0);
    assert_eq!(summary.bytes_hashed, 0);
}

#[test]
fn test_two_identical_one_different_same_size() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"0123456789").unwrap();
    fs::write(dir.path().join("b.txt"), b"0123456789").unwrap();
    fs::write(dir.path().join("c.txt"), b"abcdefghij").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(&[dir.path().to_path_buf()]).unwrap();

    // c.txt shares the size, so it is hashed, but ends up alone.
    assert_eq!(summary.hashed_files, 3);
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths(),
        vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
    );
    assert_eq!(groups[0].size, 10);
}

#[test]
fn test_text_report_format() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello world").unwrap();
    fs::write(dir.path().join("b.txt"), b"hello world").unwrap();

    let (code, out) = run_to_string(&settings_for(dir.path()));
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(lines.len(), 4);
    // SHA-256("hello world") starts with b94d27b993.
    assert_eq!(lines[1], "b94d27b993:");
    assert_eq!(lines[2], format!("\t{}", dir.path().join("a.txt").display()));
    assert_eq!(lines[3], format!("\t{}", dir.path().join("b.txt").display()));
}

#[test]
fn test_groups_ordered_by_size_then_traversal() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("z_big"), b"bigger content").unwrap();
    fs::write(sub.join("big"), b"bigger content").unwrap();
    fs::write(dir.path().join("m_small"), b"tiny").unwrap();
    fs::write(sub.join("small"), b"tiny").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(&[dir.path().to_path_buf()]).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].size, 4);
    assert_eq!(groups[1].size, 14);
    // Lexical depth-first: "m_small" < "sub" < "z_big".
    assert_eq!(groups[0].paths(), vec![dir.path().join("m_small"), sub.join("small")]);
    assert_eq!(groups[1].paths(), vec![sub.join("big"), dir.path().join("z_big")]);
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    for (name, content) in [("a", "x1"), ("b", "x1"), ("c", "x2"), ("d", "x2"), ("e", "yy")] {
        fs::write(dir.path().join(name), content).unwrap();
    }

    let settings = settings_for(dir.path());
    let (_, first) = run_to_string(&settings);
    let (_, second) = run_to_string(&settings);

    assert_eq!(first, second);
}

#[test]
fn test_thread_count_does_not_change_result() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        fs::write(dir.path().join(format!("f{i:02}")), format!("{:04}", i % 5)).unwrap();
    }
    let roots = [dir.path().to_path_buf()];

    let sequential = DuplicateFinder::new(FinderConfig::default().with_io_threads(1))
        .find_duplicates(&roots)
        .unwrap()
        .0;
    let parallel = DuplicateFinder::new(FinderConfig::default().with_io_threads(8))
        .find_duplicates(&roots)
        .unwrap()
        .0;

    assert_eq!(sequential, parallel);
    assert_eq!(sequential.len(), 5);
}

#[test]
fn test_ignore_empty_excludes_zero_byte_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty1"), b"").unwrap();
    fs::write(dir.path().join("empty2"), b"").unwrap();

    let (_, with_empty) = run_to_string(&settings_for(dir.path()));
    // SHA-256 of the empty input starts with e3b0c44298.
    assert!(with_empty.contains("e3b0c44298:"));

    let settings = Settings {
        ignore_empty: true,
        ..settings_for(dir.path())
    };
    let (_, without_empty) = run_to_string(&settings);
    assert!(!without_empty.contains("e3b0c44298"));
    assert_eq!(without_empty.lines().count(), 1);
}

#[test]
fn test_json_report() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("b"), b"same").unwrap();
    fs::write(dir.path().join("c"), b"else").unwrap();

    let settings = Settings {
        output: OutputFormat::Json,
        ..settings_for(dir.path())
    };
    let (code, out) = run_to_string(&settings);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(value["groups"].as_array().unwrap().len(), 1);
    assert_eq!(value["groups"][0]["size"], 4);
    assert_eq!(value["groups"][0]["digest"].as_str().unwrap().len(), 64);
    assert_eq!(value["groups"][0]["deleted"], serde_json::json!([]));
    assert_eq!(value["summary"]["total_files"], 3);
    assert_eq!(value["summary"]["hashed_files"], 3);
}

#[test]
fn test_full_digest_setting() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"").unwrap();
    fs::write(dir.path().join("b"), b"").unwrap();

    let settings = Settings {
        digest_prefix_len: 64,
        ..settings_for(dir.path())
    };
    let (_, out) = run_to_string(&settings);

    let header = out.lines().nth(1).unwrap();
    assert_eq!(
        header,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855:"
    );
}

#[test]
fn test_identical_content_iff_same_group() {
    let dir = tempdir().unwrap();
    let contents: Vec<(PathBuf, &[u8])> = vec![
        (dir.path().join("a"), b"alpha"),
        (dir.path().join("b"), b"bravo"),
        (dir.path().join("c"), b"alpha"),
        (dir.path().join("d"), b"bravo"),
        (dir.path().join("e"), b"alpha"),
    ];
    for (path, content) in &contents {
        fs::write(path, content).unwrap();
    }

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    for (p1, c1) in &contents {
        for (p2, c2) in &contents {
            let together = groups
                .iter()
                .any(|g| g.paths().contains(p1) && g.paths().contains(p2));
            assert_eq!(together, c1 == c2, "{} vs {}", p1.display(), p2.display());
        }
    }
}
