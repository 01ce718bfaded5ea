//! Configuration types and parsing for changelog.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up in the project directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["changelog.yml", "changelog.yaml"];

/// Project configuration from changelog.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the changelog scripts
    #[serde(default = "default_changelog_dir")]
    pub changelog_dir: String,

    /// Ledger table recording applied scripts
    #[serde(default = "default_table")]
    pub table: String,

    /// Database holding the ledger table
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Subdirectory of `changelog_dir` with first-install scripts
    #[serde(default = "default_init_dir")]
    pub init_dir: String,

    /// When to take script timestamps from git history
    #[serde(default)]
    pub git: GitMode,

    /// git executable
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Policy for git-based script timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GitMode {
    /// Use git when `git describe` succeeds in the working copy
    #[default]
    Auto,
    /// Use git whenever the binary runs
    Always,
    /// Never use git; every script timestamp is unknown
    Never,
}

impl std::fmt::Display for GitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitMode::Auto => write!(f, "auto"),
            GitMode::Always => write!(f, "always"),
            GitMode::Never => write!(f, "never"),
        }
    }
}

fn default_changelog_dir() -> String {
    "database/changelog.sql".to_string()
}

fn default_table() -> String {
    "about_changelog".to_string()
}

fn default_init_dir() -> String {
    "init".to_string()
}

fn default_git_binary() -> String {
    "git".to_string()
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            changelog_dir: default_changelog_dir(),
            table: default_table(),
            database: DatabaseConfig::default(),
            init_dir: default_init_dir(),
            git: GitMode::default(),
            git_binary: default_git_binary(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for changelog.yml or changelog.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => Err(CoreError::ConfigNotFound {
                path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
            }),
        }
    }

    /// Like [`Config::load_from_dir`], but a project without a config file
    /// gets the defaults.
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => {
                log::debug!("No config file in {}, using defaults", dir.display());
                Ok(Self::default())
            }
        }
    }

    fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.changelog_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "changelog_dir cannot be empty".to_string(),
            });
        }
        if !crate::sql_utils::is_valid_qualified_name(&self.table) {
            return Err(CoreError::ConfigInvalid {
                message: format!("'{}' is not a usable ledger table name", self.table),
            });
        }
        if self.init_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "init_dir cannot be empty".to_string(),
            });
        }
        if self.git_binary.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "git_binary cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Changelog directory resolved against the project root
    pub fn changelog_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.changelog_dir)
    }

    /// Init script directory resolved against the project root
    pub fn init_dir_absolute(&self, root: &Path) -> PathBuf {
        self.changelog_dir_absolute(root).join(&self.init_dir)
    }

    /// Database path resolved against the project root
    ///
    /// `:memory:` is passed through untouched.
    pub fn database_path_absolute(&self, root: &Path) -> String {
        if self.database.path == ":memory:" {
            self.database.path.clone()
        } else {
            root.join(&self.database.path).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
