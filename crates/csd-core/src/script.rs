//! Changelog script discovery
//!
//! A changelog directory holds one `.sql` file per database change, named so
//! that lexical order is application order. [`ScriptSet`] keeps them sorted
//! by name; everything downstream reports in that order.

use crate::error::{CoreError, CoreResult};
use crate::version_probe::VersionProbe;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A single changelog script as found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptEntry {
    /// File name including the `.sql` suffix; joins against the ledger
    pub name: String,

    /// Path the script was read from
    pub path: PathBuf,

    /// Unix timestamp of the last change, 0 when unknown
    pub modified_at: i64,

    /// Raw SQL text
    #[serde(skip)]
    pub content: String,
}

/// Check whether a directory entry name is a changelog script.
///
/// The name must end in `.sql`, have at least one character before the
/// suffix, and not start with a dot.
pub fn is_changelog_file_name(name: &str) -> bool {
    !name.starts_with('.') && name.len() > ".sql".len() && name.ends_with(".sql")
}

/// Changelog scripts keyed and ordered by name
#[derive(Debug, Clone, Default)]
pub struct ScriptSet {
    scripts: BTreeMap<String, ScriptEntry>,
}

impl ScriptSet {
    /// Load every changelog script in `dir`.
    ///
    /// With a probe, each script's `modified_at` comes from it (0 when the
    /// probe has no answer). Without one, all timestamps are 0.
    pub fn load(dir: &Path, probe: Option<&dyn VersionProbe>) -> CoreResult<Self> {
        let mut scripts = BTreeMap::new();

        for (name, path) in list_sql_files(dir)? {
            let content = read_script(&path)?;
            let modified_at = probe.and_then(|p| p.last_modified(&path)).unwrap_or(0);
            scripts.insert(
                name.clone(),
                ScriptEntry {
                    name,
                    path,
                    modified_at,
                    content,
                },
            );
        }

        log::info!("Loaded {} changelog scripts from {}", scripts.len(), dir.display());
        Ok(Self { scripts })
    }

    /// Build a set from entries already in memory.
    ///
    /// A later entry replaces an earlier one with the same name.
    pub fn from_entries(entries: impl IntoIterator<Item = ScriptEntry>) -> Self {
        Self {
            scripts: entries
                .into_iter()
                .map(|entry| (entry.name.clone(), entry))
                .collect(),
        }
    }

    /// Number of scripts
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Whether no scripts were found
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Script names in ascending order
    pub fn names(&self) -> Vec<&str> {
        self.scripts.keys().map(String::as_str).collect()
    }

    /// Look up a script by name
    pub fn get(&self, name: &str) -> Option<&ScriptEntry> {
        self.scripts.get(name)
    }

    /// Iterate scripts in ascending name order
    pub fn iter(&self) -> impl Iterator<Item = &ScriptEntry> {
        self.scripts.values()
    }

    /// Raw SQL of a script, or [`CoreError::UnknownScript`].
    pub fn content(&self, name: &str) -> CoreResult<&str> {
        self.get(name)
            .map(|s| s.content.as_str())
            .ok_or_else(|| CoreError::UnknownScript {
                name: name.to_string(),
            })
    }
}

/// Scripts for first-time database setup
///
/// Loaded from a subdirectory of the changelog directory and never compared
/// against the ledger.
#[derive(Debug, Clone, Default)]
pub struct InitScripts {
    scripts: BTreeMap<String, String>,
}

impl InitScripts {
    /// Load every script in `dir` using the same file name rules as
    /// [`ScriptSet`].
    pub fn load(dir: &Path) -> CoreResult<Self> {
        let mut scripts = BTreeMap::new();
        for (name, path) in list_sql_files(dir)? {
            scripts.insert(name, read_script(&path)?);
        }
        log::info!("Loaded {} init scripts from {}", scripts.len(), dir.display());
        Ok(Self { scripts })
    }

    /// Number of init scripts
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Whether the init directory held no scripts
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Init script names in ascending order
    pub fn names(&self) -> Vec<&str> {
        self.scripts.keys().map(String::as_str).collect()
    }

    /// Raw SQL of an init script, or [`CoreError::UnknownScript`].
    pub fn content(&self, name: &str) -> CoreResult<&str> {
        self.scripts
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| CoreError::UnknownScript {
                name: name.to_string(),
            })
    }
}

/// List `(name, path)` for changelog scripts directly inside `dir`.
fn list_sql_files(dir: &Path) -> CoreResult<Vec<(String, PathBuf)>> {
    let dir_err = |source| CoreError::DirectoryAccess {
        path: dir.display().to_string(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(dir_err)? {
        let entry = entry.map_err(dir_err)?;
        let Some(name) = entry.file_name().to_str().map(String::from) else {
            log::warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if !is_changelog_file_name(&name) {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        files.push((name, path));
    }
    Ok(files)
}

fn read_script(path: &Path) -> CoreResult<String> {
    let bytes = std::fs::read(path).map_err(|source| CoreError::ScriptRead {
        path: path.display().to_string(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
