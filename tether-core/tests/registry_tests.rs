//! Registry error-message, atomic-write-safety, and selection integration
//! tests over `<home>/.tether/configurations/<name>.yaml`.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;
use std::fs;
use tether_core::{registry, ConfigurationName, RegistryError};

fn name(s: &str) -> ConfigurationName {
    ConfigurationName::from(s)
}

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_missing_configuration_returns_not_found() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let err = registry::load_configuration_at(home.path(), &name("content")).unwrap_err();
    assert!(matches!(err, RegistryError::ConfigurationNotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("configuration not found"));
    assert!(err.to_string().contains("content.yaml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let dir = home.path().join(".tether").join("configurations");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(dir.join("content.yaml"), b": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = registry::load_configuration_at(home.path(), &name("content")).unwrap_err();
    assert!(matches!(err, RegistryError::Parse { .. }), "got: {err}");
    let msg = err.to_string();
    assert!(msg.contains("content.yaml"), "must contain file path, got: {msg}");
    let source_msg = match &err {
        RegistryError::Parse { source, .. } => source.to_string(),
        _ => unreachable!(),
    };
    assert!(!source_msg.is_empty(), "serde_yaml must provide error context");
}

#[test]
fn load_wrong_type_yaml_returns_parse_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let dir = home.path().join(".tether").join("configurations");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(dir.join("content.yaml"), b"- this is a list, not a mapping\n").expect("write");

    let err = registry::load_configuration_at(home.path(), &name("content")).unwrap_err();
    assert!(matches!(err, RegistryError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Atomic write safety
// ---------------------------------------------------------------------------

#[test]
fn define_writes_the_registry_file() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    registry::define_at(home.path(), name("content"), Some("content tree".into()))
        .expect("define");
    home.child(".tether/configurations/content.yaml")
        .assert(predicate::path::exists());
}

#[test]
fn save_cleans_up_tmp_file() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    registry::define_at(home.path(), name("content"), None).expect("define");
    home.child(".tether/configurations/content.yaml.tmp")
        .assert(predicate::path::missing());
}

#[cfg(unix)]
#[test]
fn registry_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let home = assert_fs::TempDir::new().expect("tempdir");
    registry::define_at(home.path(), name("content"), None).expect("define");
    let path = registry::configuration_path_at(home.path(), &name("content"));
    let mode = fs::metadata(&path).expect("metadata").permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

// ---------------------------------------------------------------------------
// 3. Selection
// ---------------------------------------------------------------------------

fn seeded_home() -> assert_fs::TempDir {
    let home = assert_fs::TempDir::new().expect("tempdir");
    for n in ["system", "media", "content"] {
        registry::define_at(home.path(), name(n), None).expect("define");
    }
    home
}

#[rstest]
#[case::single(&["content"], &["content"])]
#[case::request_order_preserved(&["media", "content"], &["media", "content"])]
#[case::duplicates_collapse(&["content", "content", "media"], &["content", "media"])]
#[case::unknown_names_skipped(&["content", "ghost"], &["content"])]
#[case::empty_request_selects_all_sorted(&[], &["content", "media", "system"])]
fn selection_resolves_requested_names(#[case] requested: &[&str], #[case] expected: &[&str]) {
    let home = seeded_home();
    let selected = registry::select_configurations_at(home.path(), requested).expect("select");
    let got: Vec<&str> = selected.iter().map(|c| c.name.0.as_str()).collect();
    assert_eq!(got, expected);
}

#[test]
fn empty_selection_is_rejected_before_any_run() {
    let home = seeded_home();
    let err = registry::select_configurations_at(home.path(), &["ghost"]).unwrap_err();
    match &err {
        RegistryError::NoConfigurationsSelected { requested } => {
            assert_eq!(requested, &vec!["ghost".to_string()]);
        }
        other => panic!("expected NoConfigurationsSelected, got: {other}"),
    }
    assert!(err.to_string().contains("were not defined"));
}

#[test]
fn empty_registry_rejects_even_a_select_all() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let err = registry::select_configurations_at(home.path(), &[]).unwrap_err();
    assert!(matches!(err, RegistryError::NoConfigurationsSelected { .. }));
}
