//! Crate-internal helper for invoking external tools.
//!
//! All external processes (version control, program runner) go through
//! [`run_captured`]: arguments travel as a vector (never through a shell),
//! stdio is piped, and every invocation carries a wall-clock limit. A child
//! that outlives its limit is killed rather than orphaned.

use crate::errors::WskError;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured output of a finished external process.
#[derive(Debug, Clone)]
pub(crate) struct CapturedOutput {
    /// Whether the process exited with status zero.
    pub succeeded: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// The human-readable text of this invocation: stdout when non-empty,
    /// otherwise stderr. Trailing newlines are stripped.
    pub fn text(&self) -> String {
        let stdout = self.stdout.trim_end();
        if stdout.is_empty() {
            self.stderr.trim_end().to_string()
        } else {
            stdout.to_string()
        }
    }
}

/// Run `binary` with `args` in `cwd`, capturing stdout and stderr.
///
/// A non-zero exit is not an error here; it comes back as
/// `succeeded == false` with whatever the tool printed. Errors are reserved
/// for invocations that produced no usable output at all.
///
/// # Errors
///
/// Returns [`WskError::Invocation`] if the process could not be spawned or
/// awaited, and [`WskError::ProcessTimeout`] if it exceeded `timeout` and
/// was killed.
pub(crate) async fn run_captured(
    binary: &str,
    args: &[&str],
    cwd: &Path,
    timeout: Duration,
) -> Result<CapturedOutput, WskError> {
    tracing::debug!(binary, ?args, cwd = %cwd.display(), "spawning external tool");

    let child = Command::new(binary)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| WskError::Invocation {
            binary: binary.to_string(),
            detail: e.to_string(),
        })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(WskError::Invocation {
                binary: binary.to_string(),
                detail: e.to_string(),
            });
        }
        // Dropping the wait future kills the child (kill_on_drop)
        Err(_) => {
            return Err(WskError::ProcessTimeout {
                binary: binary.to_string(),
                timeout_secs: timeout.as_secs(),
            });
        }
    };

    Ok(CapturedOutput {
        succeeded: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
