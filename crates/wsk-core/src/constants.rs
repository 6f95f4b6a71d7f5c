//! Common constants used throughout wsk-core.
//!
//! This module centralizes directory names, tool defaults, and timeout values
//! to avoid duplication and ensure consistency across the codebase.

// ============================================================================
// Directory Names
// ============================================================================

/// The name of the global WSK configuration directory.
///
/// Located at `~/.wsk/` on Unix-like systems.
pub const WSK_HOME_DIR: &str = ".wsk";

/// The default name of the managed workspace directory.
///
/// Resolved relative to the current directory unless overridden by
/// configuration, the `WSK_WORKSPACE` environment variable, or a CLI flag.
pub const DEFAULT_WORKSPACE_DIR: &str = "workspace";

/// The version-control metadata directory name.
///
/// Entries with this name are excluded from file-tree snapshots and its
/// presence at the workspace root marks the workspace as holding a clone.
pub const VCS_DIR: &str = ".git";

// ============================================================================
// Configuration Filenames
// ============================================================================

/// The name of the global configuration file.
pub const GLOBAL_CONFIG_FILENAME: &str = "config.yaml";

// ============================================================================
// Tool Defaults
// ============================================================================

/// The default version-control binary.
pub const DEFAULT_VCS_BINARY: &str = "git";

/// The default depth for shallow clones.
///
/// Workspace history is not browsable through the tool, so only the tip
/// commit is fetched.
pub const DEFAULT_CLONE_DEPTH: u32 = 1;

/// The default wall-clock limit for a version-control invocation, in seconds.
pub const DEFAULT_VCS_TIMEOUT_SECS: u64 = 120;

/// The default binary used to execute workspace programs.
pub const DEFAULT_RUNNER_BINARY: &str = "node";

/// The default wall-clock limit for a program run, in seconds.
///
/// A run that reaches this limit is killed and reported as a timeout; it
/// never wedges the terminal session.
pub const DEFAULT_RUNNER_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Tests
// ============================================================================
