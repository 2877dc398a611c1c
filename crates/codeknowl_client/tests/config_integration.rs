//! Integration tests for config load/save and the backend config reader.

use codeknowl_client::config::{
    self, get_backend_base_url, read_backend_config, CodeKnowlSection, Config, ConfigSource,
    FileConfigSource, DEFAULT_BACKEND_BASE_URL,
};
use predicates::prelude::*;
use std::time::Duration;

fn with_url(url: &str) -> Config {
    Config {
        codeknowl: CodeKnowlSection {
            backend_base_url: Some(url.into()),
            request_timeout_secs: None,
        },
    }
}

#[test]
fn absent_setting_uses_default() {
    assert_eq!(get_backend_base_url(&Config::default()), "http://localhost:8000");
    assert_eq!(DEFAULT_BACKEND_BASE_URL, "http://localhost:8000");
}

#[test]
fn empty_setting_uses_default() {
    assert_eq!(get_backend_base_url(&with_url("")), DEFAULT_BACKEND_BASE_URL);
    assert_eq!(get_backend_base_url(&with_url("   ")), DEFAULT_BACKEND_BASE_URL);
}

#[test]
fn trailing_slashes_are_stripped() {
    for (raw, expected) in [
        ("http://backend:9000", "http://backend:9000"),
        ("http://backend:9000/", "http://backend:9000"),
        ("http://backend:9000///", "http://backend:9000"),
        ("https://example.com/api/", "https://example.com/api"),
    ] {
        assert_eq!(get_backend_base_url(&with_url(raw)), expected, "raw = {raw}");
    }
}

#[test]
fn only_slashes_falls_back_to_default() {
    assert_eq!(get_backend_base_url(&with_url("///")), DEFAULT_BACKEND_BASE_URL);
}

#[test]
fn other_namespaces_are_not_read() {
    let cfg = with_url("http://backend");
    assert_eq!(cfg.get("other", "backendBaseUrl"), None);
    assert_eq!(cfg.get("codeknowl", "unknown"), None);
}

#[test]
fn timeout_is_optional_and_zero_means_none() {
    let mut cfg = with_url("http://backend/");
    assert_eq!(read_backend_config(&cfg).request_timeout, None);

    cfg.codeknowl.request_timeout_secs = Some("30".into());
    let backend = read_backend_config(&cfg);
    assert_eq!(backend.base_url, "http://backend");
    assert_eq!(backend.request_timeout, Some(Duration::from_secs(30)));

    cfg.codeknowl.request_timeout_secs = Some("0".into());
    assert_eq!(read_backend_config(&cfg).request_timeout, None);
}

#[test]
fn bad_timeout_is_ignored_but_url_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    for bad in ["abc", "-5", "1.5", "[30]"] {
        let yaml = format!(
            "codeknowl:\n  backendBaseUrl: \"http://backend:9000/\"\n  requestTimeoutSecs: {bad}\n"
        );
        std::fs::write(&path, yaml).unwrap();

        let backend = read_backend_config(&FileConfigSource::new(&path));
        assert_eq!(backend.base_url, "http://backend:9000", "timeout = {bad}");
        assert_eq!(backend.request_timeout, None, "timeout = {bad}");
    }
}

#[test]
fn quoted_timeout_is_accepted_and_saved_as_a_number() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "codeknowl:\n  backendBaseUrl: http://backend\n  requestTimeoutSecs: \"30\"\n",
    )
    .unwrap();

    let cfg = config::load(&path).unwrap();
    assert_eq!(
        read_backend_config(&cfg).request_timeout,
        Some(Duration::from_secs(30))
    );

    config::save(&path, &cfg).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(predicates::str::contains("requestTimeoutSecs: 30\n").eval(&contents));
}

#[test]
fn load_existing_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        r#"
codeknowl:
  backendBaseUrl: "http://backend.internal:8000/"
  requestTimeoutSecs: 45
"#,
    )
    .unwrap();

    let cfg = config::load(&config_path).expect("load should succeed");
    assert_eq!(
        cfg.codeknowl.backend_base_url.as_deref(),
        Some("http://backend.internal:8000/")
    );
    assert_eq!(cfg.codeknowl.request_timeout_secs.as_deref(), Some("45"));
}

#[test]
fn load_rejects_invalid_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "codeknowl: [not, a, map").unwrap();

    assert!(config::load(&config_path).is_err());
}

#[test]
fn save_creates_directory_and_file_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("codeknowl");
    let config_path = config_dir.join("config.yaml");
    assert!(!config_dir.exists(), "config dir should not exist yet");

    config::save(&config_path, &with_url("http://backend:8000")).expect("save should succeed");

    assert!(predicates::path::exists().eval(&config_path));
    let contents = std::fs::read_to_string(&config_path).unwrap();
    assert!(predicates::str::contains("backendBaseUrl").eval(&contents));
    assert!(
        !predicates::str::contains("requestTimeoutSecs").eval(&contents),
        "unset keys are not written"
    );

    let reloaded = config::load(&config_path).unwrap();
    assert_eq!(reloaded, with_url("http://backend:8000"));
}

#[test]
fn file_source_missing_file_reads_as_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileConfigSource::new(dir.path().join("absent.yaml"));

    assert_eq!(source.get("codeknowl", "backendBaseUrl"), None);
    assert_eq!(get_backend_base_url(&source), DEFAULT_BACKEND_BASE_URL);
}

#[test]
fn file_source_picks_up_edits_without_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let source = FileConfigSource::new(&path);

    config::save(&path, &with_url("http://first:1/")).unwrap();
    assert_eq!(get_backend_base_url(&source), "http://first:1");

    config::save(&path, &with_url("http://second:2")).unwrap();
    assert_eq!(get_backend_base_url(&source), "http://second:2");
}

#[test]
fn file_source_unreadable_file_reads_as_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "codeknowl: \"just a string\"\n").unwrap();

    let source = FileConfigSource::new(&path);
    assert_eq!(get_backend_base_url(&source), DEFAULT_BACKEND_BASE_URL);
}

/// Config path resolves to `~/.codeknowl/config.yaml` using the current platform's home dir.
#[test]
fn default_config_path_uses_home_directory() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().to_str().unwrap().to_string();

    let key = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    let original = std::env::var(key).ok();

    std::env::set_var(key, &home);
    let path = config::default_config_path();
    match original {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }

    let path = path.expect("should resolve a config path");
    assert_eq!(path, dir.path().join(".codeknowl").join("config.yaml"));
}

#[test]
fn explicit_config_path_wins() {
    let explicit = std::path::Path::new("/tmp/explicit.yaml");
    assert_eq!(
        config::resolve_config_path(Some(explicit)).as_deref(),
        Some(explicit)
    );
}
