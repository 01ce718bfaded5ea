//! Runtime context for CLI commands

use anyhow::{Context, Result};
use csd_core::{Config, CoreResult, GitMode, GitProbe, ScriptSet, VersionProbe};
use csd_db::{Database, DuckDbBackend};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Project configuration with command line overrides applied
pub struct RuntimeContext {
    /// Project root; relative config paths resolve against it
    pub root: PathBuf,

    /// Effective configuration
    pub config: Config,
}

/// What the run learned about git
#[derive(Debug, Default)]
pub struct GitStatus {
    /// `git --version`, when git was checked and runs
    pub version: Option<String>,

    /// `git describe` of the project checkout
    pub app_version: Option<String>,

    /// Probe used for script timestamps; `None` disables update detection
    pub probe: Option<GitProbe>,

    /// git was skipped by configuration
    pub disabled: bool,
}

impl GitStatus {
    /// Whether script timestamps come from git
    pub fn timestamps_enabled(&self) -> bool {
        self.probe.is_some()
    }

    /// The probe as a trait object, for [`ScriptSet::load`]
    pub fn version_probe(&self) -> Option<&dyn VersionProbe> {
        self.probe.as_ref().map(|p| p as &dyn VersionProbe)
    }
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        // Absolute, so script paths stay valid when git runs from the root
        let root = std::env::current_dir()
            .context("Failed to read current directory")?
            .join(&args.project_dir);

        // Load config from custom path or project directory
        let mut config = if let Some(config_path) = &args.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            Config::load_or_default(&root).context("Failed to load project configuration")?
        };

        if let Some(dir) = &args.changelog_dir {
            config.changelog_dir = dir.clone();
        }
        if let Some(table) = &args.table {
            config.table = table.clone();
        }
        if let Some(database) = &args.database {
            config.database.path = database.clone();
        }
        if let Some(git) = args.git {
            config.git = git.into();
        }
        config.validate().context("Invalid configuration")?;

        Ok(Self { root, config })
    }

    /// Changelog directory as given on the command line or in config
    pub fn changelog_dir(&self) -> PathBuf {
        self.config.changelog_dir_absolute(&self.root)
    }

    /// Directory holding first-install scripts
    pub fn init_dir(&self) -> PathBuf {
        self.config.init_dir_absolute(&self.root)
    }

    /// Ledger table name
    pub fn table(&self) -> &str {
        &self.config.table
    }

    /// Open the database holding the ledger, read-only. A missing database
    /// file is an error, never created.
    pub fn connect(&self) -> Result<Arc<dyn Database>> {
        let path = self.config.database_path_absolute(&self.root);
        log::debug!("Opening database {path} read-only");
        let db: Arc<dyn Database> = Arc::new(
            DuckDbBackend::open_read_only(&path).context("Failed to connect to database")?,
        );
        Ok(db)
    }

    /// Decide whether script timestamps come from git.
    ///
    /// In `auto` mode git is only trusted when `git describe` succeeds,
    /// i.e. the project is a tagged checkout rather than an export.
    pub fn git(&self) -> GitStatus {
        if self.config.git == GitMode::Never {
            return GitStatus {
                disabled: true,
                ..Default::default()
            };
        }

        let probe = GitProbe::new(&self.config.git_binary).with_workdir(&self.root);
        let Some(version) = probe.version() else {
            log::warn!(
                "{} is not available, changed scripts cannot be detected",
                self.config.git_binary
            );
            return GitStatus::default();
        };
        let app_version = probe.describe();

        let use_probe = match self.config.git {
            GitMode::Always => true,
            _ => app_version.is_some(),
        };
        if !use_probe {
            log::warn!("git describe failed, changed scripts cannot be detected");
        }

        GitStatus {
            version: Some(version),
            app_version,
            probe: use_probe.then_some(probe),
            disabled: false,
        }
    }

    /// Load the changelog scripts, with git timestamps when enabled
    pub fn load_scripts(&self, git: &GitStatus) -> CoreResult<ScriptSet> {
        ScriptSet::load(&self.changelog_dir(), git.version_probe())
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
