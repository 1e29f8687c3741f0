use crate::domain::Version;
use crate::error::{PepbumpError, Result};
use crate::substitution::DEFAULT_VERSION_TOKEN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project-local configuration file.
pub const LOCAL_CONFIG_FILE: &str = "pepbump.toml";

/// History file name used when neither the command line nor the
/// configuration names one. It lives next to the store file.
pub const DEFAULT_HISTORY_FILE: &str = "pepbump_history.txt";

/// Tool configuration for pepbump.
///
/// Every field has a default, so a missing file or a partial file are both fine.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub substitution: SubstitutionConfig,

    #[serde(default)]
    pub git: GitConfig,
}

fn default_store() -> PathBuf {
    PathBuf::from("pepbump.yaml")
}

/// Locations of the store and history files.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_store")]
    pub store: PathBuf,

    /// Relative to the current directory when set. Unset means
    /// [DEFAULT_HISTORY_FILE] in the store file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<PathBuf>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            store: default_store(),
            history: None,
        }
    }
}

/// Default history location for a given store file.
pub fn default_history_path(store_path: &Path) -> PathBuf {
    crate::store::resolve_path(store_path, DEFAULT_HISTORY_FILE)
}

fn default_version_token() -> String {
    DEFAULT_VERSION_TOKEN.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SubstitutionConfig {
    /// Literal token replaced by the version string in templates
    #[serde(default = "default_version_token")]
    pub version_token: String,
}

impl Default for SubstitutionConfig {
    fn default() -> Self {
        SubstitutionConfig {
            version_token: default_version_token(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_bump_message() -> String {
    "Automatic version bump".to_string()
}

fn default_set_message() -> String {
    "Manually set version".to_string()
}

fn default_tag_format() -> String {
    "{version}".to_string()
}

/// Settings for the commit/push/tag step.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Commit and history message used by `bump` when none is given
    #[serde(default = "default_bump_message")]
    pub bump_message: String,

    /// Commit and history message used by `set-version` when none is given
    #[serde(default = "default_set_message")]
    pub set_message: String,

    /// Tag name pattern, `{version}` is replaced by the new version
    #[serde(default = "default_tag_format")]
    pub tag_format: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            bump_message: default_bump_message(),
            set_message: default_set_message(),
            tag_format: default_tag_format(),
        }
    }
}

impl GitConfig {
    /// Tag name for a version (e.g. "v{version}" -> "v1.2.3")
    pub fn tag_name(&self, version: &Version) -> String {
        self.tag_format.replace("{version}", &version.to_string())
    }
}

impl Config {
    fn validate(&self) -> Result<()> {
        if self.substitution.version_token.is_empty() {
            return Err(PepbumpError::config("substitution.version_token must not be empty"));
        }
        if !self.git.tag_format.contains("{version}") {
            return Err(PepbumpError::config(format!(
                "git.tag_format '{}' must contain the {{version}} placeholder",
                self.git.tag_format
            )));
        }
        Ok(())
    }
}

/// Location of the user-wide configuration file, if the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pepbump").join("config.toml"))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `pepbump.toml` in current directory
/// 3. `<config dir>/pepbump/config.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed, or holds invalid values
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        Some(PathBuf::from(LOCAL_CONFIG_FILE))
    } else {
        user_config_path().filter(|p| p.exists())
    };

    let Some(path) = path else {
        return Ok(Config::default());
    };

    let text = fs::read_to_string(&path).map_err(|e| {
        PepbumpError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config: Config = toml::from_str(&text)
        .map_err(|e| PepbumpError::config(format!("invalid {}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}
