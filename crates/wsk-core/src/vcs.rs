//! Version-control gateway.
//!
//! [`VcsGateway`] wraps the configured version-control binary behind three
//! operations: clone, stage-all, commit. It never parses repository state
//! itself; the tool's exit status and output are the source of truth, and a
//! non-zero exit that still produced text (for example "nothing to commit")
//! comes back as a [`VcsCommandResult`] rather than an error.

use crate::config::VcsConfig;
use crate::errors::WskError;
use crate::process::run_captured;
use crate::workspace::RepoUrl;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Outcome of one version-control invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcsCommandResult {
    /// Whether the tool exited with status zero.
    pub succeeded: bool,

    /// Tool output: stdout when non-empty, otherwise stderr.
    pub text: String,
}

/// Thin wrapper around the configured version-control binary.
#[derive(Debug, Clone)]
pub struct VcsGateway {
    binary: String,
    clone_depth: u32,
    timeout: Duration,
}

impl VcsGateway {
    /// Build a gateway from configuration.
    pub fn new(config: &VcsConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            clone_depth: config.clone_depth,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Clone `url` into `target`, which must be an existing empty directory.
    ///
    /// The clone is shallow (configured depth). Arguments travel as a
    /// vector with a `--` separator, so the URL can never be parsed as a
    /// tool flag.
    pub async fn clone_repo(
        &self,
        url: &RepoUrl,
        target: &Path,
    ) -> Result<VcsCommandResult, WskError> {
        tracing::info!(url = %url, target = %target.display(), "cloning repository");

        let depth = self.clone_depth.to_string();
        let args = ["clone", "--depth", depth.as_str(), "--", url.as_str(), "."];
        let output = run_captured(&self.binary, &args, target, self.timeout).await?;

        Ok(VcsCommandResult {
            succeeded: output.succeeded,
            text: output.text(),
        })
    }

    /// Stage every change in `target` (`add .`).
    pub async fn stage_all(&self, target: &Path) -> Result<VcsCommandResult, WskError> {
        tracing::debug!(target = %target.display(), "staging all changes");

        let output = run_captured(&self.binary, &["add", "."], target, self.timeout).await?;
        Ok(VcsCommandResult {
            succeeded: output.succeeded,
            text: output.text(),
        })
    }

    /// Commit staged changes in `target` with `message`.
    ///
    /// The message is a single argument; quoting is never involved.
    pub async fn commit(
        &self,
        target: &Path,
        message: &str,
    ) -> Result<VcsCommandResult, WskError> {
        tracing::debug!(target = %target.display(), message, "committing staged changes");

        let output =
            run_captured(&self.binary, &["commit", "-m", message], target, self.timeout).await?;
        Ok(VcsCommandResult {
            succeeded: output.succeeded,
            text: output.text(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .expect("git should run");
        assert!(status.success(), "git {args:?} failed");
    }

    /// Create a repository with one commit and return a clonable URL for it.
    fn seed_origin(dir: &Path) -> RepoUrl {
        git(dir, &["init"]);
        git(dir, &["config", "user.email", "dev@example.com"]);
        git(dir, &["config", "user.name", "Dev"]);
        std::fs::write(dir.join("README.md"), "# origin\n").unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-m", "initial"]);
        RepoUrl::try_new(format!("file://{}", dir.display())).unwrap()
    }

    #[tokio::test]
    async fn test_clone_repo_from_local_origin() {
        if !git_available() {
            return;
        }
        let origin = TempDir::new().unwrap();
        let url = seed_origin(origin.path());

        let target = TempDir::new().unwrap();
        let gateway = VcsGateway::new(&VcsConfig::default());
        let result = gateway.clone_repo(&url, target.path()).await.unwrap();

        assert!(result.succeeded, "clone output: {}", result.text);
        assert!(target.path().join("README.md").is_file());
        assert!(target.path().join(".git").is_dir());
    }

    #[tokio::test]
    async fn test_clone_repo_reports_failure_text() {
        if !git_available() {
            return;
        }
        let target = TempDir::new().unwrap();
        let gateway = VcsGateway::new(&VcsConfig::default());
        let url = RepoUrl::try_new("file:///no/such/origin-repo").unwrap();

        let result = gateway.clone_repo(&url, target.path()).await.unwrap();
        assert!(!result.succeeded);
        assert!(!result.text.is_empty());
    }

    #[tokio::test]
    async fn test_stage_and_commit() {
        if !git_available() {
            return;
        }
        let repo = TempDir::new().unwrap();
        git(repo.path(), &["init"]);
        git(repo.path(), &["config", "user.email", "dev@example.com"]);
        git(repo.path(), &["config", "user.name", "Dev"]);
        std::fs::write(repo.path().join("a.txt"), "one\n").unwrap();

        let gateway = VcsGateway::new(&VcsConfig::default());
        let staged = gateway.stage_all(repo.path()).await.unwrap();
        assert!(staged.succeeded);

        let committed = gateway.commit(repo.path(), "add a.txt").await.unwrap();
        assert!(committed.succeeded, "commit output: {}", committed.text);
        assert!(committed.text.contains("add a.txt"));
    }

    #[tokio::test]
    async fn test_commit_with_nothing_staged() {
        if !git_available() {
            return;
        }
        let repo = TempDir::new().unwrap();
        git(repo.path(), &["init"]);
        git(repo.path(), &["config", "user.email", "dev@example.com"]);
        git(repo.path(), &["config", "user.name", "Dev"]);

        let gateway = VcsGateway::new(&VcsConfig::default());
        let result = gateway.commit(repo.path(), "empty").await.unwrap();

        assert!(!result.succeeded);
        assert!(result.text.contains("nothing to commit"));
    }
}
