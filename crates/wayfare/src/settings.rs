//! Layered configuration: built-in defaults, then the TOML file, then
//! `WAYFARE__SECTION__KEY` environment variables.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::DEFAULT_BASE_URL;

pub const APP_NAME: &str = "wayfare";

/// Session file name inside the state directory.
pub const SESSION_FILE: &str = "session.json";

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Result type for configuration loading.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("serializing default config to TOML: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("expanding path {path}: {message}")]
    Expand { path: String, message: String },

    #[error("unable to determine {0} directory")]
    NoDirectory(&'static str),

    #[error("invalid config file path: {0}")]
    InvalidPath(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Append logs here instead of stderr.
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub state_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Show sample packages and statistics when a fetch fails.
    pub sample_on_error: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            sample_on_error: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_file: PathBuf,
    pub state_dir: PathBuf,
}

impl AppPaths {
    /// Resolve the config file (a directory override gets `config.toml`
    /// appended) and the default state directory.
    pub fn discover(override_path: Option<PathBuf>) -> SettingsResult<Self> {
        let config_file = match override_path {
            Some(path) => {
                let expanded = expand_path(path)?;
                if expanded.is_dir() {
                    expanded.join(CONFIG_FILE)
                } else {
                    expanded
                }
            }
            None => default_config_dir()?.join(CONFIG_FILE),
        };

        if config_file.parent().is_none() {
            return Err(SettingsError::InvalidPath(config_file));
        }

        Ok(Self {
            config_file,
            state_dir: default_state_dir()?,
        })
    }

    pub fn apply_overrides(mut self, cfg: &AppConfig) -> SettingsResult<Self> {
        if let Some(ref state_override) = cfg.paths.state_dir {
            self.state_dir = expand_str_path(state_override)?;
        }
        Ok(self)
    }

    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join(SESSION_FILE)
    }
}

impl fmt::Display for AppPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "config: {}, state: {}",
            self.config_file.display(),
            self.state_dir.display()
        )
    }
}

/// Write the default config if none exists, then load it.
pub fn load_or_init_config(config_file: &Path) -> SettingsResult<AppConfig> {
    if !config_file.exists() {
        write_default_config(config_file)?;
    }
    load_config(config_file, None)
}

/// Load configuration from `config_file` and the environment.
///
/// `env` replaces the process environment when given.
pub fn load_config(
    config_file: &Path,
    env: Option<config::Map<String, String>>,
) -> SettingsResult<AppConfig> {
    let defaults = AppConfig::default();
    let built = Config::builder()
        .set_default("api.base_url", defaults.api.base_url)?
        .set_default("api.timeout_secs", defaults.api.timeout_secs)?
        .set_default("logging.level", defaults.logging.level)?
        .set_default("catalog.sample_on_error", defaults.catalog.sample_on_error)?
        .add_source(
            File::from(config_file)
                .format(FileFormat::Toml)
                .required(false),
        )
        .add_source(
            Environment::with_prefix(env_prefix().as_str())
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    let mut config: AppConfig = built.try_deserialize()?;

    if let Some(ref file) = config.logging.file {
        let expanded = expand_str_path(file)?;
        config.logging.file = Some(expanded.display().to_string());
    }

    Ok(config)
}

pub fn write_default_config(path: &Path) -> SettingsResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
            action: "creating config directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let toml = toml::to_string_pretty(&AppConfig::default())?;
    let mut body = default_config_header(path);
    body.push_str(&toml);
    fs::write(path, body).map_err(|source| SettingsError::Io {
        action: "writing config file",
        path: path.to_path_buf(),
        source,
    })
}

fn default_config_header(path: &Path) -> String {
    let mut buffer = String::new();
    buffer.push_str("# Configuration for ");
    buffer.push_str(APP_NAME);
    buffer.push('\n');
    buffer.push_str("# File: ");
    buffer.push_str(&path.display().to_string());
    buffer.push_str("\n\n");
    buffer
}

fn expand_path(path: PathBuf) -> SettingsResult<PathBuf> {
    if let Some(text) = path.to_str() {
        expand_str_path(text)
    } else {
        Ok(path)
    }
}

/// Expand `~` and environment variables in a path.
pub fn expand_str_path(text: &str) -> SettingsResult<PathBuf> {
    let expanded = shellexpand::full(text).map_err(|e| SettingsError::Expand {
        path: text.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.to_string()))
}

pub fn default_config_dir() -> SettingsResult<PathBuf> {
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir).join(APP_NAME));
    }

    if let Some(mut dir) = dirs::config_dir() {
        dir.push(APP_NAME);
        return Ok(dir);
    }

    dirs::home_dir()
        .map(|home| home.join(".config").join(APP_NAME))
        .ok_or(SettingsError::NoDirectory("configuration"))
}

pub fn default_state_dir() -> SettingsResult<PathBuf> {
    if let Some(dir) = env::var_os("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir).join(APP_NAME));
    }

    if let Some(mut dir) = dirs::state_dir() {
        dir.push(APP_NAME);
        return Ok(dir);
    }

    dirs::home_dir()
        .map(|home| home.join(".local").join("state").join(APP_NAME))
        .ok_or(SettingsError::NoDirectory("state"))
}

/// `WAYFARE`, derived from the app name.
pub fn env_prefix() -> String {
    APP_NAME
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env() -> Option<config::Map<String, String>> {
        Some(config::Map::new())
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("missing.toml"), no_env()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert!(config.catalog.sample_on_error);
    }

    #[test]
    fn test_written_default_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        write_default_config(&path).unwrap();
        let config = load_config(&path, no_env()).unwrap();

        let body = fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("# Configuration for wayfare"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_then_env_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[api]\nbase_url = \"http://api.internal/api\"\ntimeout_secs = 5\n\n[catalog]\nsample_on_error = false\n",
        )
        .unwrap();

        let mut env = config::Map::new();
        env.insert("WAYFARE__API__TIMEOUT_SECS".to_string(), "12".to_string());
        let config = load_config(&path, Some(env)).unwrap();

        assert_eq!(config.api.base_url, "http://api.internal/api");
        assert_eq!(config.api.timeout_secs, 12);
        assert!(!config.catalog.sample_on_error);
    }

    #[test]
    fn test_state_dir_override() {
        let paths = AppPaths {
            config_file: PathBuf::from("/tmp/wayfare/config.toml"),
            state_dir: PathBuf::from("/tmp/default-state"),
        };
        let mut cfg = AppConfig::default();
        cfg.paths.state_dir = Some("/tmp/custom-state".to_string());

        let paths = paths.apply_overrides(&cfg).unwrap();
        assert_eq!(paths.session_file(), PathBuf::from("/tmp/custom-state/session.json"));
    }

    #[test]
    fn test_discover_directory_override() {
        let dir = TempDir::new().unwrap();
        let paths = AppPaths::discover(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(paths.config_file, dir.path().join(CONFIG_FILE));
    }

    #[test]
    fn test_env_prefix() {
        assert_eq!(env_prefix(), "WAYFARE");
    }
}
