//! Error types for wsk-core.
//!
//! All fallible operations in this crate return [`WskError`]. Variants that
//! surface to callers verbatim (clone, read, write) carry stable message
//! prefixes; downstream UIs match on those strings.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all WSK operations.
#[derive(Error, Debug)]
pub enum WskError {
    /// A user-supplied relative path resolved outside the workspace root.
    #[error("Path `{0}` escapes the workspace root")]
    PathEscape(String),

    /// The requested file does not exist in the workspace.
    #[error("Failed to read file: `{0}` not found in the workspace")]
    FileNotFound(String),

    /// An existing file could not be read.
    #[error("Failed to read file: {detail}")]
    ReadFailed {
        /// Workspace-relative path of the file.
        path: String,
        /// The underlying I/O message.
        detail: String,
    },

    /// A file could not be written.
    #[error("Failed to write file: {detail}")]
    WriteFailed {
        /// Workspace-relative path of the file.
        path: String,
        /// The underlying I/O message.
        detail: String,
    },

    /// The version-control tool reported a clone failure.
    #[error("Failed to clone repository: {detail}")]
    CloneFailed {
        /// Combined tool output describing the failure.
        detail: String,
    },

    /// An external binary could not be spawned or awaited.
    ///
    /// Distinct from a non-zero exit: the tool never produced usable output.
    #[error("Failed to invoke `{binary}`: {detail}")]
    Invocation {
        /// The binary that was invoked.
        binary: String,
        /// The underlying spawn or wait error.
        detail: String,
    },

    /// An external process exceeded its wall-clock limit and was killed.
    #[error("`{binary}` timed out after {timeout_secs}s")]
    ProcessTimeout {
        /// The binary that was killed.
        binary: String,
        /// The limit that was exceeded.
        timeout_secs: u64,
    },

    /// A repository URL failed validation before any tool was invoked.
    #[error("Invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    /// A path exists but cannot serve the requested role.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A required path does not exist on disk.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The global configuration file exists but could not be loaded.
    #[error("Invalid global config: {0}")]
    InvalidGlobalConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Catch-all for wrapped errors from lower layers.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
