//! Configuration types for WSK.
//!
//! Global configuration lives at `~/.wsk/config.yaml` and controls where the
//! managed workspace sits and which external tools back the version-control
//! and program-execution operations. A missing file is not an error; every
//! field falls back to a default so a fresh machine works out of the box.

use crate::constants::{
    DEFAULT_CLONE_DEPTH, DEFAULT_RUNNER_BINARY, DEFAULT_RUNNER_TIMEOUT_SECS, DEFAULT_VCS_BINARY,
    DEFAULT_VCS_TIMEOUT_SECS, DEFAULT_WORKSPACE_DIR, GLOBAL_CONFIG_FILENAME, WSK_HOME_DIR,
};
use crate::errors::WskError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// Sections
// ============================================================================

/// Workspace placement settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Directory holding the managed workspace.
    ///
    /// Relative values are resolved against the current directory.
    #[serde(default = "default_workspace_dir")]
    pub dir: String,
}

/// Version-control tool settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VcsConfig {
    /// Binary to invoke for clone/stage/commit.
    #[serde(default = "default_vcs_binary")]
    pub binary: String,

    /// Depth passed to shallow clones.
    #[serde(default = "default_clone_depth")]
    pub clone_depth: u32,

    /// Wall-clock limit for a single invocation, in seconds.
    #[serde(default = "default_vcs_timeout_secs")]
    pub timeout_secs: u64,
}

/// Program-execution settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Interpreter binary used to execute workspace programs.
    #[serde(default = "default_runner_binary")]
    pub binary: String,

    /// Wall-clock limit for a single run, in seconds.
    #[serde(default = "default_runner_timeout_secs")]
    pub timeout_secs: u64,
}

// Serde default helpers. Kept as free functions so `#[serde(default = ...)]`
// and the Default impls share one source of truth.

fn default_workspace_dir() -> String {
    DEFAULT_WORKSPACE_DIR.to_string()
}

fn default_vcs_binary() -> String {
    DEFAULT_VCS_BINARY.to_string()
}

fn default_clone_depth() -> u32 {
    DEFAULT_CLONE_DEPTH
}

fn default_vcs_timeout_secs() -> u64 {
    DEFAULT_VCS_TIMEOUT_SECS
}

fn default_runner_binary() -> String {
    DEFAULT_RUNNER_BINARY.to_string()
}

fn default_runner_timeout_secs() -> u64 {
    DEFAULT_RUNNER_TIMEOUT_SECS
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            dir: default_workspace_dir(),
        }
    }
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            binary: default_vcs_binary(),
            clone_depth: default_clone_depth(),
            timeout_secs: default_vcs_timeout_secs(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            binary: default_runner_binary(),
            timeout_secs: default_runner_timeout_secs(),
        }
    }
}

// ============================================================================
// GlobalConfig
// ============================================================================

/// Global configuration (`~/.wsk/config.yaml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlobalConfig {
    /// Workspace placement.
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Version-control tool settings.
    #[serde(default)]
    pub vcs: VcsConfig,

    /// Program-execution settings.
    #[serde(default)]
    pub runner: RunnerConfig,
}

impl GlobalConfig {
    /// The global WSK configuration directory (`~/.wsk`).
    ///
    /// Returns `None` when the home directory cannot be determined.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(WSK_HOME_DIR))
    }

    /// The default global configuration file path (`~/.wsk/config.yaml`).
    pub fn default_path() -> Option<PathBuf> {
        Self::default_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILENAME))
    }

    /// Load the global configuration from the default location.
    ///
    /// A missing file (or an undeterminable home directory) yields the
    /// built-in defaults. An existing file that fails to read or parse is an
    /// error: silently ignoring a broken config would mask typos.
    pub fn load_default() -> Result<Self, WskError> {
        match Self::default_path() {
            Some(path) => Self::from_path(&path),
            None => {
                tracing::debug!("Could not determine home directory; using default config");
                Ok(Self::default())
            }
        }
    }

    /// Load the global configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`WskError::InvalidGlobalConfig`] if the file exists but could
    /// not be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, WskError> {
        if !path.exists() {
            tracing::debug!(
                "Global config not found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            WskError::InvalidGlobalConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            WskError::InvalidGlobalConfig(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        Ok(config)
    }

    /// Validate the configuration, returning human-readable warnings.
    ///
    /// Warnings never block execution; callers log them and continue.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.workspace.dir.trim().is_empty() {
            warnings.push("workspace.dir is empty; falling back to `workspace`".to_string());
        }
        if self.vcs.binary.trim().is_empty() {
            warnings.push("vcs.binary is empty; version-control operations will fail".to_string());
        }
        if self.vcs.clone_depth == 0 {
            warnings.push("vcs.clone_depth is 0; the tool will reject the clone".to_string());
        }
        if self.vcs.timeout_secs == 0 {
            warnings.push("vcs.timeout_secs is 0; every invocation will time out".to_string());
        }
        if self.runner.binary.trim().is_empty() {
            warnings.push("runner.binary is empty; program execution will fail".to_string());
        }
        if self.runner.timeout_secs == 0 {
            warnings.push("runner.timeout_secs is 0; every run will time out".to_string());
        }

        warnings
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_constants() {
        let config = GlobalConfig::default();
        assert_eq!(config.workspace.dir, "workspace");
        assert_eq!(config.vcs.binary, "git");
        assert_eq!(config.vcs.clone_depth, 1);
        assert_eq!(config.vcs.timeout_secs, 120);
        assert_eq!(config.runner.binary, "node");
        assert_eq!(config.runner.timeout_secs, 10);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GlobalConfig::from_path(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "vcs:\n  clone_depth: 5\n").unwrap();

        let config = GlobalConfig::from_path(&path).unwrap();
        assert_eq!(config.vcs.clone_depth, 5);
        assert_eq!(config.vcs.binary, "git");
        assert_eq!(config.workspace.dir, "workspace");
    }

    #[test]
    fn test_full_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "workspace:\n  dir: sandbox\nvcs:\n  binary: git\n  clone_depth: 2\n  timeout_secs: 30\nrunner:\n  binary: deno\n  timeout_secs: 5\n",
        )
        .unwrap();

        let config = GlobalConfig::from_path(&path).unwrap();
        assert_eq!(config.workspace.dir, "sandbox");
        assert_eq!(config.vcs.clone_depth, 2);
        assert_eq!(config.vcs.timeout_secs, 30);
        assert_eq!(config.runner.binary, "deno");
        assert_eq!(config.runner.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "workspace: [not, a, mapping").unwrap();

        let err = GlobalConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, WskError::InvalidGlobalConfig(_)));
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_validate_flags_zero_timeouts() {
        let mut config = GlobalConfig::default();
        config.vcs.timeout_secs = 0;
        config.runner.binary = String::new();

        let warnings = config.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("vcs.timeout_secs")));
        assert!(warnings.iter().any(|w| w.contains("runner.binary")));
    }

    #[test]
    fn test_validate_default_is_clean() {
        assert!(GlobalConfig::default().validate().is_empty());
    }
}
