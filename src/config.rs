//! Configuration file loading
//!
//! The configuration is a TOML file. Every section is optional:
//!
//! ```toml
//! [check.version_overrides]
//! foopkg = "1.2.3"
//!
//! [check.providers.github]
//! api_key = "ghp_..."
//!
//! [check.providers.gitlab.api_keys]
//! "gitlab.com" = "glpat-..."
//!
//! [commit]
//! author = "John Doe <john@example.com>"
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Location of the config file relative to the config directory
const CONFIG_FILE: &str = "bumper/config.toml";

/// Separator in `NAME=VERSION` override strings
const OVERRIDE_SEPARATOR: char = '=';

/// Top level configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub check: CheckConfig,
    pub commit: CommitConfig,
}

/// Configuration of the check step
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CheckConfig {
    /// Upstream version to use instead of querying providers, by pkgbase
    pub version_overrides: HashMap<String, String>,
    pub providers: ProvidersConfig,
}

/// Upstream provider credentials
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProvidersConfig {
    pub github: GitHubConfig,
    pub gitlab: GitLabConfig,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GitLabConfig {
    /// API keys by GitLab host
    pub api_keys: HashMap<String, String>,
}

/// Configuration of the commit step
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CommitConfig {
    /// Author passed to `git commit --author`
    pub author: Option<String>,
}

impl Config {
    /// Parse configuration from TOML content. `path` is only used for errors.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load the configuration.
    ///
    /// An explicitly requested file has to exist. The default file may be
    /// missing, in which case the default configuration is returned.
    pub fn load(requested: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match requested {
            Some(path) => {
                std::fs::metadata(path).map_err(|source| ConfigError::InvalidPath {
                    path: path.to_path_buf(),
                    source,
                })?;
                path.to_path_buf()
            }
            None => {
                let path = config_path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&content, &path)
    }

    /// Merge overrides on top of the configured ones; the given ones win
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = (String, String)>) -> Self {
        self.check.version_overrides.extend(overrides);
        self
    }
}

/// Parse a `NAME=VERSION` override string
pub fn parse_override(value: &str) -> Result<(String, String), ConfigError> {
    value
        .split_once(OVERRIDE_SEPARATOR)
        .map(|(name, version)| (name.to_string(), version.to_string()))
        .ok_or_else(|| ConfigError::InvalidOverride {
            value: value.to_string(),
        })
}

/// Returns the path of the default config file.
/// Uses $XDG_CONFIG_HOME/bumper/config.toml if XDG_CONFIG_HOME is set,
/// otherwise ~/.config/bumper/config.toml.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    config_path_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

fn config_path_with_env(
    xdg_config_home: Option<String>,
    home_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .map(|dir| dir.join(CONFIG_FILE))
        .ok_or(ConfigError::UnknownPath)
}
