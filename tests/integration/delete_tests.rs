use dupscan::actions::{Confirmer, PromptConfirmer, ScriptedConfirmer, DELETE_PROMPT};
use dupscan::config::Settings;
use dupscan::error::ExitCode;
use dupscan::output::OutputFormat;
use dupscan::{run_scan, run_scan_with_shutdown};
use std::cell::RefCell;
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;
use std::rc::Rc;
use tempfile::tempdir;

fn delete_settings(root: &Path) -> Settings {
    Settings {
        directory_paths: vec![root.to_path_buf()],
        delete_duplicates: true,
        ..Settings::default()
    }
}

fn populate(root: &Path) {
    fs::write(root.join("a.txt"), b"0123456789").unwrap();
    fs::write(root.join("b.txt"), b"0123456789").unwrap();
    fs::write(root.join("c.txt"), b"abcdefghij").unwrap();
    fs::write(root.join("d.txt"), b"dup").unwrap();
    fs::write(root.join("e.txt"), b"dup").unwrap();
    fs::write(root.join("f.txt"), b"dup").unwrap();
}

#[test]
fn test_confirmed_deletion_keeps_first_of_each_group() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let mut confirmer = ScriptedConfirmer::new(true);
    let mut out = Vec::new();
    let code = run_scan(
        &delete_settings(dir.path()),
        &mut confirmer,
        &mut out,
        None,
        false,
    )
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(confirmer.asked(), 1);
    for kept in ["a.txt", "c.txt", "d.txt"] {
        assert!(dir.path().join(kept).exists(), "{kept} should survive");
    }
    for gone in ["b.txt", "e.txt", "f.txt"] {
        assert!(!dir.path().join(gone).exists(), "{gone} should be deleted");
    }

    let out = String::from_utf8(out).unwrap();
    let annotated: Vec<&str> = out
        .lines()
        .filter(|l| l.ends_with(" ... Deleting duplicate."))
        .collect();
    assert_eq!(annotated.len(), 3);
    assert!(out.contains(&format!("\t{}\n", dir.path().join("a.txt").display())));
}

#[test]
fn test_declined_deletion_touches_nothing() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let mut confirmer = ScriptedConfirmer::new(false);
    let mut out = Vec::new();
    let code = run_scan(
        &delete_settings(dir.path()),
        &mut confirmer,
        &mut out,
        None,
        false,
    )
    .unwrap();

    assert_eq!(code, ExitCode::Declined);
    assert_ne!(code.as_i32(), 0);
    assert!(out.is_empty());
    for name in ["a.txt", "b.txt", "c.txt", "d.txt", "e.txt", "f.txt"] {
        assert!(dir.path().join(name).exists());
    }
}

#[test]
fn test_only_exact_y_confirms() {
    for answer in ["Y\n", "yes\n", " y\n", "\n", ""] {
        let dir = tempdir().unwrap();
        populate(dir.path());

        let mut confirmer = PromptConfirmer::new(Cursor::new(answer.as_bytes().to_vec()), Vec::new());
        let mut out = Vec::new();
        let code = run_scan(
            &delete_settings(dir.path()),
            &mut confirmer,
            &mut out,
            None,
            false,
        )
        .unwrap();

        assert_eq!(code, ExitCode::Declined, "answer {answer:?}");
        assert!(dir.path().join("b.txt").exists(), "answer {answer:?}");
        assert_eq!(
            String::from_utf8(confirmer.into_output()).unwrap(),
            DELETE_PROMPT
        );
    }
}

#[test]
fn test_prompt_is_asked_even_without_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("only"), b"unique").unwrap();

    let mut confirmer = ScriptedConfirmer::new(true);
    let mut out = Vec::new();
    let code = run_scan(
        &delete_settings(dir.path()),
        &mut confirmer,
        &mut out,
        None,
        false,
    )
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(confirmer.asked(), 1);
    assert!(dir.path().join("only").exists());
}

#[test]
fn test_json_report_lists_deleted_paths() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("b"), b"same").unwrap();

    let settings = Settings {
        output: OutputFormat::Json,
        ..delete_settings(dir.path())
    };
    let mut confirmer = ScriptedConfirmer::new(true);
    let mut out = Vec::new();
    run_scan(&settings, &mut confirmer, &mut out, None, false).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let b = dir.path().join("b").to_string_lossy().into_owned();
    assert_eq!(value["groups"][0]["deleted"], serde_json::json!([b]));
    assert_eq!(value["summary"]["deleted_files"], 1);
    assert_eq!(value["summary"]["bytes_freed"], 4);
    assert!(!dir.path().join("b").exists());
}

#[test]
fn test_rescan_after_deletion_finds_nothing() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let mut confirmer = ScriptedConfirmer::new(true);
    run_scan(
        &delete_settings(dir.path()),
        &mut confirmer,
        &mut Vec::<u8>::new(),
        None,
        false,
    )
    .unwrap();

    let report_only = Settings {
        delete_duplicates: false,
        ..delete_settings(dir.path())
    };
    let mut out = Vec::new();
    run_scan(&report_only, &mut confirmer, &mut out, None, false).unwrap();

    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
}

/// Confirmer that logs when it is asked into a shared event list.
struct LoggingConfirmer {
    answer: bool,
    events: Rc<RefCell<Vec<&'static str>>>,
}

impl Confirmer for LoggingConfirmer {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        self.events.borrow_mut().push("confirm");
        Ok(self.answer)
    }
}

#[test]
fn test_interrupt_hook_installed_after_confirmation() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let events = Rc::new(RefCell::new(Vec::new()));
    let mut confirmer = LoggingConfirmer {
        answer: true,
        events: Rc::clone(&events),
    };
    let install_events = Rc::clone(&events);

    let code = run_scan_with_shutdown(
        &delete_settings(dir.path()),
        &mut confirmer,
        &mut Vec::<u8>::new(),
        move || {
            install_events.borrow_mut().push("install");
            Ok(None)
        },
        false,
    )
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(*events.borrow(), vec!["confirm", "install"]);
}

#[test]
fn test_declined_prompt_never_installs_interrupt_hook() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let events = Rc::new(RefCell::new(Vec::new()));
    let mut confirmer = LoggingConfirmer {
        answer: false,
        events: Rc::clone(&events),
    };
    let install_events = Rc::clone(&events);

    let code = run_scan_with_shutdown(
        &delete_settings(dir.path()),
        &mut confirmer,
        &mut Vec::<u8>::new(),
        move || {
            install_events.borrow_mut().push("install");
            Ok(None)
        },
        false,
    )
    .unwrap();

    assert_eq!(code, ExitCode::Declined);
    assert_eq!(*events.borrow(), vec!["confirm"]);
    assert!(dir.path().join("b.txt").exists());
}
