// tests/config_test.rs
use pepbump::config::{load_config, Config, LOCAL_CONFIG_FILE};
use pepbump::PepbumpError;
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

fn temp_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_from_file() {
    let temp_file = temp_config(
        r#"
[files]
store = "conf/versions.yaml"

[substitution]
version_token = "@VERSION@"

[git]
remote = "upstream"
bump_message = "Release"
tag_format = "v{version}"
"#,
    );

    let config = load_config(Some(temp_file.path())).unwrap();
    assert_eq!(config.files.store, PathBuf::from("conf/versions.yaml"));
    assert_eq!(config.files.history, None);
    assert_eq!(config.substitution.version_token, "@VERSION@");
    assert_eq!(config.git.remote, "upstream");
    assert_eq!(config.git.bump_message, "Release");
    assert_eq!(config.git.set_message, "Manually set version");
    assert_eq!(config.git.tag_format, "v{version}");
}

#[test]
fn test_empty_file_gives_defaults() {
    let temp_file = temp_config("");
    let config = load_config(Some(temp_file.path())).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_toml_is_config_error() {
    let temp_file = temp_config("[git\nremote = ");
    let err = load_config(Some(temp_file.path())).unwrap_err();
    assert!(matches!(err, PepbumpError::Config(_)), "got {:?}", err);
}

#[test]
fn test_invalid_tag_format_is_rejected() {
    let temp_file = temp_config("[git]\ntag_format = \"release\"\n");
    let err = load_config(Some(temp_file.path())).unwrap_err();
    assert!(err.to_string().contains("{version}"));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, PepbumpError::Config(_)));
}

#[test]
#[serial]
fn test_local_config_is_discovered() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(LOCAL_CONFIG_FILE),
        "[files]\nhistory = \"CHANGES.txt\"\n",
    )
    .unwrap();

    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None);
    std::env::set_current_dir(&original_dir).unwrap();

    let config = result.unwrap();
    assert_eq!(config.files.history, Some(PathBuf::from("CHANGES.txt")));
    assert_eq!(config.files.store, PathBuf::from("pepbump.yaml"));
}
