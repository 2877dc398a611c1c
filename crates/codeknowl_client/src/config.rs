//! Client config: the `codeknowl.*` settings, their YAML file at
//! `~/.codeknowl/config.yaml`, and the backend config reader.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Settings namespace.
pub const NAMESPACE: &str = "codeknowl";

/// Key of the backend base URL setting.
pub const BACKEND_BASE_URL_KEY: &str = "backendBaseUrl";

/// Key of the optional per-request timeout, in seconds.
pub const REQUEST_TIMEOUT_KEY: &str = "requestTimeoutSecs";

/// Used when `backendBaseUrl` is absent or blank.
pub const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:8000";

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "CODEKNOWL_CONFIG";

/// Host-provided key/value settings store.
pub trait ConfigSource: Send + Sync {
    /// Raw value of `section.key`, or `None` when unset.
    fn get(&self, section: &str, key: &str) -> Option<String>;
}

/// Backend connection settings, resolved fresh for every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL without trailing slashes.
    pub base_url: String,
    pub request_timeout: Option<Duration>,
}

/// Backend base URL from `codeknowl.backendBaseUrl`, defaulted and with all
/// trailing `/` removed.
pub fn get_backend_base_url(source: &dyn ConfigSource) -> String {
    let raw = source
        .get(NAMESPACE, BACKEND_BASE_URL_KEY)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let url = raw.as_deref().unwrap_or(DEFAULT_BACKEND_BASE_URL);
    let stripped = url.trim_end_matches('/');
    if stripped.is_empty() {
        // A value made only of slashes would otherwise leave no host at all.
        DEFAULT_BACKEND_BASE_URL.to_string()
    } else {
        stripped.to_string()
    }
}

/// Base URL plus the optional request timeout.
pub fn read_backend_config(source: &dyn ConfigSource) -> BackendConfig {
    let request_timeout = source
        .get(NAMESPACE, REQUEST_TIMEOUT_KEY)
        .and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(0) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                warn!(
                    value = %raw,
                    "ignoring {}.{}: not a whole number of seconds",
                    NAMESPACE,
                    REQUEST_TIMEOUT_KEY
                );
                None
            }
        });
    BackendConfig {
        base_url: get_backend_base_url(source),
        request_timeout,
    }
}

/// `codeknowl:` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CodeKnowlSection {
    #[serde(rename = "backendBaseUrl", skip_serializing_if = "Option::is_none")]
    pub backend_base_url: Option<String>,
    /// Kept as raw text so a bad value only loses the timeout, not the file.
    #[serde(
        rename = "requestTimeoutSecs",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar_as_text",
        serialize_with = "text_as_scalar"
    )]
    pub request_timeout_secs: Option<String>,
}

/// Any YAML scalar as its text; `null` reads as unset.
fn scalar_as_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(de)?;
    Ok(value.and_then(|v| match v {
        serde_yaml::Value::Null => None,
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        other => serde_yaml::to_string(&other)
            .ok()
            .map(|s| s.trim_end().to_string()),
    }))
}

/// Whole numbers are written back unquoted.
fn text_as_scalar<S>(value: &Option<String>, ser: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value.as_deref() {
        Some(v) => match v.trim().parse::<u64>() {
            Ok(n) => ser.serialize_u64(n),
            Err(_) => ser.serialize_str(v),
        },
        None => ser.serialize_none(),
    }
}

/// Full config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub codeknowl: CodeKnowlSection,
}

impl ConfigSource for Config {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        if section != NAMESPACE {
            return None;
        }
        match key {
            BACKEND_BASE_URL_KEY => self.codeknowl.backend_base_url.clone(),
            REQUEST_TIMEOUT_KEY => self.codeknowl.request_timeout_secs.clone(),
            _ => None,
        }
    }
}

/// Config file that is re-read on every lookup, so edits apply to the next
/// command without a restart. A missing file reads as "nothing set".
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file contents, or defaults when the file does not exist.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match load(&self.path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Config::default())
            }
            other => other,
        }
    }
}

impl ConfigSource for FileConfigSource {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        match self.load() {
            Ok(cfg) => cfg.get(section, key),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable config, using defaults");
                None
            }
        }
    }
}

/// Returns the default config file path: `~/.codeknowl/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".codeknowl").join("config.yaml"))
}

/// Config path from an explicit override, then `CODEKNOWL_CONFIG`, then the default.
pub fn resolve_config_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = override_path {
        return Some(p.to_path_buf());
    }
    if let Some(val) = std::env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(val));
    }
    default_config_path()
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Load config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    // An empty file is a valid "nothing set" config.
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(&contents)?)
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Config load/save error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
