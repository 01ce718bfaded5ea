//! Error types for csd-core

use thiserror::Error;

/// Core error type for changelog-sql-diff
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Changelog directory missing or unreadable
    #[error("[C001] Can't open directory '{path}': {source}")]
    DirectoryAccess {
        path: String,
        source: std::io::Error,
    },

    /// C002: A changelog script could not be read
    #[error("[C002] Failed to read script '{path}': {source}")]
    ScriptRead {
        path: String,
        source: std::io::Error,
    },

    /// C003: Script requested by name was never loaded
    #[error("[C003] Unknown script: {name}")]
    UnknownScript { name: String },

    /// C004: Configuration file not found
    #[error("[C004] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C005: Failed to parse configuration file
    #[error("[C005] Failed to parse config: {0}")]
    ConfigParseError(#[from] serde_yaml::Error),

    /// C006: Invalid configuration value
    #[error("[C006] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C007: IO error with file path context
    #[error("[C007] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
