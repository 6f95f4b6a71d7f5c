//! Workspace program execution.
//!
//! Programs inside the workspace run under the configured interpreter in a
//! separate OS process: working directory pinned to the workspace root,
//! stdio captured, and a hard wall-clock limit. Workspace code is never
//! evaluated inside this process.

use crate::config::RunnerConfig;
use crate::errors::WskError;
use crate::process::run_captured;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Output of one program run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    /// Whether the interpreter exited with status zero.
    pub succeeded: bool,

    /// Program output: stdout when non-empty, otherwise stderr.
    pub text: String,
}

/// Runs workspace programs with the configured interpreter.
#[derive(Debug, Clone)]
pub struct ProgramRunner {
    binary: String,
    timeout: Duration,
}

impl ProgramRunner {
    /// Build a runner from configuration.
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Execute `program` with `cwd` as the working directory.
    ///
    /// `program` must already be resolved to an absolute path inside the
    /// workspace; this type does no sandbox checks of its own.
    ///
    /// # Errors
    ///
    /// Returns [`WskError::Invocation`] if the interpreter could not be
    /// spawned and [`WskError::ProcessTimeout`] if the run was killed at the
    /// configured limit. A program that merely exits non-zero is not an
    /// error; its output comes back with `succeeded == false`.
    pub async fn run(&self, program: &Path, cwd: &Path) -> Result<RunOutput, WskError> {
        tracing::info!(program = %program.display(), "executing workspace program");

        let program = program.to_string_lossy();
        let output = run_captured(&self.binary, &[program.as_ref()], cwd, self.timeout).await?;

        Ok(RunOutput {
            succeeded: output.succeeded,
            text: output.text(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sh_runner(timeout_secs: u64) -> ProgramRunner {
        ProgramRunner::new(&RunnerConfig {
            binary: "sh".to_string(),
            timeout_secs,
        })
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_program_output() {
        let dir = TempDir::new().unwrap();
        let program = dir.path().join("main.sh");
        std::fs::write(&program, "printf out-from-program\n").unwrap();

        let output = sh_runner(5).run(&program, dir.path()).await.unwrap();
        assert!(output.succeeded);
        assert_eq!(output.text, "out-from-program");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reports_nonzero_exit_with_text() {
        let dir = TempDir::new().unwrap();
        let program = dir.path().join("broken.sh");
        std::fs::write(&program, "printf oops >&2\nexit 1\n").unwrap();

        let output = sh_runner(5).run(&program, dir.path()).await.unwrap();
        assert!(!output.succeeded);
        assert_eq!(output.text, "oops");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_kills_hung_program() {
        let dir = TempDir::new().unwrap();
        let program = dir.path().join("hang.sh");
        std::fs::write(&program, "sleep 30\n").unwrap();

        let err = sh_runner(1).run(&program, dir.path()).await.unwrap_err();
        assert!(matches!(err, WskError::ProcessTimeout { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_uses_cwd_for_relative_access() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("data.txt"), "from-cwd").unwrap();
        let program = dir.path().join("read.sh");
        std::fs::write(&program, "cat data.txt\n").unwrap();

        let output = sh_runner(5).run(&program, dir.path()).await.unwrap();
        assert!(output.succeeded);
        assert_eq!(output.text, "from-cwd");
    }
}
