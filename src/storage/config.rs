//! Configuration management
//!
//! Base URL and timeout come from the command line, the environment, or
//! `~/.trioexplorer/config.toml`, in that order of priority. Environment files
//! (`~/.trioexplorer/.env`, then the nearest project `.env`) are loaded once at
//! startup and never override variables that are already set.

use super::Result;
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const API_KEY_ENV: &str = "TRIOEXPLORER_API_KEY";
pub const API_URL_ENV: &str = "TRIOEXPLORER_API_URL";
pub const DEFAULT_API_URL: &str = "https://search.trioexplorer.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const APP_DIR_NAME: &str = ".trioexplorer";
const CONFIG_FILE_NAME: &str = "config.toml";
const ENV_FILE_NAME: &str = ".env";

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Search API base URL
    pub url: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,
}

/// Where the effective base URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    CommandLine,
    Environment,
    ConfigFile,
    Default,
}

impl fmt::Display for UrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UrlSource::CommandLine => "--api-url",
            UrlSource::Environment => API_URL_ENV,
            UrlSource::ConfigFile => "config file",
            UrlSource::Default => "default",
        };
        f.write_str(label)
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(app_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn set_url(&mut self, url: String) {
        self.url = Some(url.trim_end_matches('/').to_string());
    }

    /// Resolve the base URL: command line, then `TRIOEXPLORER_API_URL`, then
    /// the config file, then the production default.
    pub fn resolve_base_url(&self, override_url: Option<&str>) -> (String, UrlSource) {
        let env_url = std::env::var(API_URL_ENV).ok();
        self.pick_base_url(override_url, env_url.as_deref())
    }

    fn pick_base_url(&self, override_url: Option<&str>, env_url: Option<&str>) -> (String, UrlSource) {
        let candidates = [
            (override_url, UrlSource::CommandLine),
            (env_url, UrlSource::Environment),
            (self.url.as_deref(), UrlSource::ConfigFile),
        ];

        candidates
            .into_iter()
            .find_map(|(url, source)| {
                url.filter(|u| !u.is_empty())
                    .map(|u| (u.trim_end_matches('/').to_string(), source))
            })
            .unwrap_or_else(|| (DEFAULT_API_URL.to_string(), UrlSource::Default))
    }

    /// Resolve the request timeout: command line, then the config file, then 60s.
    pub fn resolve_timeout(&self, override_timeout: Option<Duration>) -> Duration {
        override_timeout.unwrap_or_else(|| {
            Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS))
        })
    }
}

/// `~/.trioexplorer`
pub fn app_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;
    Ok(home_dir.join(APP_DIR_NAME))
}

/// Path of the per-user `.env` file, for messages
pub fn system_env_file_display() -> String {
    match app_dir() {
        Ok(dir) => dir.join(ENV_FILE_NAME).to_string_lossy().to_string(),
        Err(_) => format!("~/{}/{}", APP_DIR_NAME, ENV_FILE_NAME),
    }
}

/// Load `~/.trioexplorer/.env` and then the nearest `.env` above the working
/// directory. Missing files are not an error.
pub fn load_env_files() {
    if let Ok(dir) = app_dir() {
        let system_env = dir.join(ENV_FILE_NAME);
        if system_env.exists() {
            if let Err(e) = dotenvy::from_path(&system_env) {
                log::warn!("Failed to load {}: {}", system_env.display(), e);
            }
        }
    }

    match dotenvy::dotenv() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("Failed to load .env: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.url.is_none());
        assert!(config.timeout_seconds.is_none());
    }

    #[test]
    fn test_set_url_strips_trailing_slash() {
        let mut config = Config::default();
        config.set_url("http://localhost:8001/".to_string());
        assert_eq!(config.url, Some("http://localhost:8001".to_string()));
    }

    #[test]
    fn test_config_load_save() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            url: Some("http://localhost:8001".to_string()),
            timeout_seconds: Some(15),
        };

        config
            .save(Some(config_path.clone()))
            .expect("Failed to save config");

        let loaded_config = Config::load(Some(config_path)).expect("Failed to load config");
        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let nonexistent_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load(Some(nonexistent_path)).expect("Failed to load default config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "url = [unterminated").expect("Failed to write config");

        let result = Config::load(Some(config_path));
        assert!(matches!(
            result,
            Err(StorageError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_base_url_priority() {
        let config = Config {
            url: Some("http://from-file".to_string()),
            timeout_seconds: None,
        };

        assert_eq!(
            config.pick_base_url(Some("http://from-cli/"), Some("http://from-env")),
            ("http://from-cli".to_string(), UrlSource::CommandLine)
        );
        assert_eq!(
            config.pick_base_url(None, Some("http://from-env/")),
            ("http://from-env".to_string(), UrlSource::Environment)
        );
        assert_eq!(
            config.pick_base_url(Some(""), Some("")),
            ("http://from-file".to_string(), UrlSource::ConfigFile)
        );
        assert_eq!(
            Config::default().pick_base_url(None, None),
            (DEFAULT_API_URL.to_string(), UrlSource::Default)
        );
    }

    #[test]
    fn test_timeout_priority() {
        let config = Config {
            url: None,
            timeout_seconds: Some(30),
        };
        assert_eq!(config.resolve_timeout(Some(Duration::from_millis(2500))), Duration::from_millis(2500));
        assert_eq!(config.resolve_timeout(None), Duration::from_secs(30));
        assert_eq!(
            Config::default().resolve_timeout(None),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }
}
