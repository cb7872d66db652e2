use clap::Parser;
use dupscan::cli::Cli;
use dupscan::config::{ConfigError, Settings};
use dupscan::output::OutputFormat;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_settings_file_then_flags() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(
        &path,
        r#"
directory_paths = ["/srv/a", "/srv/b"]
delete_duplicates = true
trash = true
digest_prefix_len = 16
"#,
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "dupscan",
        "--config",
        path.to_str().unwrap(),
        "--output",
        "json",
    ])
    .unwrap();
    let settings = Settings::load(&cli).unwrap();

    assert_eq!(
        settings.directory_paths,
        vec![PathBuf::from("/srv/a"), PathBuf::from("/srv/b")]
    );
    assert!(settings.delete_duplicates);
    assert!(settings.trash);
    assert_eq!(settings.digest_prefix_len, 16);
    assert_eq!(settings.output, OutputFormat::Json);
}

#[test]
fn test_out_of_range_prefix_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "digest_prefix_len = 65\n").unwrap();

    let cli = Cli::try_parse_from(["dupscan", "--config", path.to_str().unwrap()]).unwrap();
    let err = Settings::load(&cli).unwrap_err();

    assert!(matches!(
        err,
        ConfigError::Invalid {
            key: "digest_prefix_len",
            ..
        }
    ));
}

#[test]
fn test_unknown_output_format_in_file_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "output = \"xml\"\n").unwrap();

    let cli = Cli::try_parse_from(["dupscan", "--config", path.to_str().unwrap()]).unwrap();
    assert!(matches!(Settings::load(&cli), Err(ConfigError::Load(_))));
}
