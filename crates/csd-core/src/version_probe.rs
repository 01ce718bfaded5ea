//! Version-control timestamps for changelog scripts
//!
//! A file's modification time on disk says nothing useful after a fresh
//! checkout, so the last commit touching the file is used instead. The
//! lookup sits behind [`VersionProbe`] so the comparison can run with a fake
//! or with no version control at all.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Source of last-modified timestamps for script files.
pub trait VersionProbe {
    /// Unix timestamp of the last change to `path`, or `None` when unknown.
    ///
    /// Implementations never fail: a missing tool, a path without history
    /// or unparseable output all mean "unknown".
    fn last_modified(&self, path: &Path) -> Option<i64>;
}

/// Probe backed by the `git` command line tool.
#[derive(Debug, Clone)]
pub struct GitProbe {
    binary: PathBuf,
    workdir: Option<PathBuf>,
}

impl GitProbe {
    /// Create a probe that runs `binary` (usually just `git`).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            workdir: None,
        }
    }

    /// Run git from `dir` instead of the process working directory.
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Version reported by `git --version`, or `None` when the binary is
    /// missing or broken.
    pub fn version(&self) -> Option<String> {
        let version = self.run(&["--version"])?;
        Some(
            version
                .strip_prefix("git version ")
                .unwrap_or(&version)
                .to_string(),
        )
    }

    /// The application version from `git describe`, if the working copy has
    /// a reachable tag.
    pub fn describe(&self) -> Option<String> {
        self.run(&["describe"])
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run the tool and return the first line of stdout on success.
    fn run(&self, args: &[&str]) -> Option<String> {
        let output = self.command().args(args).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout.lines().next()?.trim();
        if line.is_empty() {
            None
        } else {
            Some(line.to_string())
        }
    }
}

impl VersionProbe for GitProbe {
    fn last_modified(&self, path: &Path) -> Option<i64> {
        // The path goes through argv after `--`, never through a shell.
        let output = self
            .command()
            .args(["log", "-n", "1", "--pretty=format:%at", "--"])
            .arg(path)
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                log::debug!("git log failed for {}: {e}", path.display());
                return None;
            }
        };
        if !output.status.success() {
            log::debug!(
                "git log exited with {} for {}",
                output.status,
                path.display()
            );
            return None;
        }

        let timestamp = parse_timestamp(&String::from_utf8_lossy(&output.stdout));
        log::debug!("{}: last commit at {:?}", path.display(), timestamp);
        timestamp
    }
}

/// Parse the first line of `git log --pretty=format:%at` output.
fn parse_timestamp(stdout: &str) -> Option<i64> {
    stdout.lines().next()?.trim().parse().ok()
}

/// Probe answering from a fixed table, for tests and callers that already
/// know the timestamps.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    timestamps: HashMap<PathBuf, i64>,
}

impl StaticProbe {
    /// Create an empty probe; every lookup answers `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a timestamp for `path`.
    pub fn with(mut self, path: impl Into<PathBuf>, timestamp: i64) -> Self {
        self.timestamps.insert(path.into(), timestamp);
        self
    }
}

impl VersionProbe for StaticProbe {
    fn last_modified(&self, path: &Path) -> Option<i64> {
        self.timestamps.get(path).copied()
    }
}

#[cfg(test)]
#[path = "version_probe_test.rs"]
mod tests;
