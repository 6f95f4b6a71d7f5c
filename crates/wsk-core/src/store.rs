//! The workspace store: every operation that touches the workspace root.
//!
//! [`WorkspaceStore`] owns the [`Workspace`] plus the external-tool gateways
//! and serializes all root-touching operations behind one asynchronous
//! mutex. Whole-workspace replacement (clone) and file-level reads/writes
//! therefore never interleave: a read can never observe a half-deleted tree.
//! The lock is held across the external process too; throughput is not a
//! goal here, a single editor session is.

use crate::config::GlobalConfig;
use crate::errors::WskError;
use crate::runner::{ProgramRunner, RunOutput};
use crate::tree::{self, count_nodes, FileNode};
use crate::vcs::{VcsCommandResult, VcsGateway};
use crate::workspace::{RepoUrl, Workspace};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

// ============================================================================
// WorkspaceStatus
// ============================================================================

/// A point-in-time report on the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStatus {
    /// Absolute path of the workspace root.
    pub workspace_root: PathBuf,

    /// Whether the workspace currently holds a cloned repository.
    pub has_repository: bool,

    /// Number of files in the snapshot (version-control metadata excluded).
    pub file_count: usize,

    /// Number of folders in the snapshot.
    pub folder_count: usize,

    /// Last modification time of the workspace root, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

// ============================================================================
// WorkspaceStore
// ============================================================================

/// Owns the workspace and mediates every operation against it.
#[derive(Debug)]
pub struct WorkspaceStore {
    workspace: Workspace,
    vcs: VcsGateway,
    runner: ProgramRunner,
    lock: Mutex<()>,
}

impl WorkspaceStore {
    /// Open a store over the workspace at `root`, configured by `config`.
    ///
    /// The root directory is created if absent.
    pub fn open(root: impl AsRef<Path>, config: &GlobalConfig) -> anyhow::Result<Self> {
        let workspace = Workspace::at(root)?;
        tracing::debug!(root = %workspace.root().display(), "opened workspace store");

        Ok(Self {
            vcs: VcsGateway::new(&config.vcs),
            runner: ProgramRunner::new(&config.runner),
            workspace,
            lock: Mutex::new(()),
        })
    }

    /// Open with the default global configuration (`~/.wsk/config.yaml`).
    pub fn with_defaults(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = GlobalConfig::load_default()?;
        Self::open(root, &config)
    }

    /// The managed workspace.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Replace the workspace contents with a fresh shallow clone of `url`.
    ///
    /// Everything previously in the workspace is deleted first; callers are
    /// expected to warn about unsaved edits before getting here. On success
    /// the new file tree is returned.
    ///
    /// # Errors
    ///
    /// Returns [`WskError::CloneFailed`] when the tool reports failure; the
    /// workspace is left empty in that case, not half-populated.
    pub async fn clone_repo(&self, url: &RepoUrl) -> Result<Vec<FileNode>, WskError> {
        let _guard = self.lock.lock().await;
        let root = self.workspace.root();

        match tokio::fs::remove_dir_all(root).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(WskError::Io(e)),
        }
        tokio::fs::create_dir_all(root).await?;

        let result = self.vcs.clone_repo(url, root).await?;
        if !result.succeeded {
            tracing::warn!(url = %url, "clone failed: {}", result.text);
            return Err(WskError::CloneFailed {
                detail: result.text,
            });
        }

        self.snapshot_locked().await
    }

    /// Read a workspace file as UTF-8 text.
    pub async fn read_file(&self, path: &str) -> Result<String, WskError> {
        let _guard = self.lock.lock().await;
        let resolved = self.workspace.resolve(path)?;

        match tokio::fs::read_to_string(&resolved).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(WskError::FileNotFound(path.to_string()))
            }
            Err(e) => Err(WskError::ReadFailed {
                path: path.to_string(),
                detail: e.to_string(),
            }),
        }
    }

    /// Write (create or overwrite) a workspace file with UTF-8 text.
    ///
    /// The parent directory must already exist; paths are never implicitly
    /// created, so a typo cannot silently grow the tree.
    pub async fn write_file(&self, path: &str, content: &str) -> Result<(), WskError> {
        let _guard = self.lock.lock().await;
        let resolved = self.workspace.resolve(path)?;

        tracing::debug!(path, bytes = content.len(), "writing workspace file");
        tokio::fs::write(&resolved, content)
            .await
            .map_err(|e| WskError::WriteFailed {
                path: path.to_string(),
                detail: e.to_string(),
            })
    }

    /// Take a file-tree snapshot of the workspace.
    pub async fn snapshot_tree(&self) -> Result<Vec<FileNode>, WskError> {
        let _guard = self.lock.lock().await;
        self.snapshot_locked().await
    }

    /// Stage everything, then commit with `message`.
    ///
    /// A stage failure is returned as-is without attempting the commit;
    /// committing after a failed stage would record a partial tree. Outcomes
    /// with tool text (including "nothing to commit") are results, not
    /// errors.
    pub async fn commit(&self, message: &str) -> Result<VcsCommandResult, WskError> {
        let _guard = self.lock.lock().await;
        let root = self.workspace.root();
        tracing::info!(message, "commit requested");

        let staged = self.vcs.stage_all(root).await?;
        if !staged.succeeded {
            return Ok(staged);
        }

        self.vcs.commit(root, message).await
    }

    /// Execute the program at `path` inside the workspace.
    ///
    /// The path is sandbox-resolved first; what the interpreter makes of the
    /// target (including a missing file) is reported through [`RunOutput`].
    pub async fn run_program(&self, path: &str) -> Result<RunOutput, WskError> {
        let _guard = self.lock.lock().await;
        let resolved = self.workspace.resolve(path)?;

        self.runner.run(&resolved, self.workspace.root()).await
    }

    /// Report current workspace state.
    pub async fn status(&self) -> Result<WorkspaceStatus, WskError> {
        let _guard = self.lock.lock().await;

        let nodes = self.snapshot_locked().await?;
        let (file_count, folder_count) = count_nodes(&nodes);

        let modified_at = tokio::fs::metadata(self.workspace.root())
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);

        Ok(WorkspaceStatus {
            workspace_root: self.workspace.root().to_path_buf(),
            has_repository: self.workspace.has_repository(),
            file_count,
            folder_count,
            modified_at,
        })
    }

    /// Snapshot with the lock already held. The walk is synchronous
    /// filesystem work, so it runs on the blocking pool.
    async fn snapshot_locked(&self) -> Result<Vec<FileNode>, WskError> {
        let root = self.workspace.root().to_path_buf();
        tokio::task::spawn_blocking(move || tree::snapshot(&root))
            .await
            .map_err(|e| WskError::Other(anyhow::anyhow!("snapshot task failed: {e}")))?
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(dir: &TempDir) -> WorkspaceStore {
        let mut config = GlobalConfig::default();
        // Shell as the interpreter keeps run tests hermetic
        config.runner.binary = "sh".to_string();
        config.runner.timeout_secs = 5;
        WorkspaceStore::open(dir.path().join("workspace"), &config).unwrap()
    }

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

    fn seed_origin(dir: &Path) -> RepoUrl {
        git(dir, &["init"]);
        git(dir, &["config", "user.email", "dev@example.com"]);
        git(dir, &["config", "user.name", "Dev"]);
        std::fs::create_dir_all(dir.join("src")).unwrap();
        std::fs::write(dir.join("README.md"), "# origin\n").unwrap();
        std::fs::write(dir.join("src/main.js"), "console.log('hi');\n").unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-m", "initial"]);
        RepoUrl::try_new(format!("file://{}", dir.display())).unwrap()
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.write_file("notes.md", "hello\n").await.unwrap();
        let content = store.read_file("notes.md").await.unwrap();
        assert_eq!(content, "hello\n");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let err = store.read_file("absent.txt").await.unwrap_err();
        assert!(matches!(err, WskError::FileNotFound(_)));
        assert!(err.to_string().starts_with("Failed to read file: "));
    }

    #[tokio::test]
    async fn test_write_requires_existing_parent() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let err = store.write_file("no/such/dir/file.txt", "x").await.unwrap_err();
        assert!(matches!(err, WskError::WriteFailed { .. }));
        assert!(err.to_string().starts_with("Failed to write file: "));
    }

    #[tokio::test]
    async fn test_read_rejects_escaping_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("outside.txt"), "secret").unwrap();
        let store = test_store(&dir);

        let err = store.read_file("../outside.txt").await.unwrap_err();
        assert!(matches!(err, WskError::PathEscape(_)));
    }

    #[tokio::test]
    async fn test_write_rejects_escaping_path() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let err = store.write_file("../evil.txt", "x").await.unwrap_err();
        assert!(matches!(err, WskError::PathEscape(_)));
        assert!(!dir.path().join("evil.txt").exists());
    }

    // A cloned repo can carry symlinks; a dangling one must not let a write
    // create its target outside the root.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_rejects_dangling_symlink() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let planted = dir.path().join("planted.txt");
        std::os::unix::fs::symlink(&planted, store.workspace().root().join("link")).unwrap();

        let err = store.write_file("link", "escaped").await.unwrap_err();
        assert!(matches!(err, WskError::PathEscape(_)));
        assert!(!planted.exists(), "no file may appear outside the workspace");
    }

    #[tokio::test]
    async fn test_snapshot_tree_lists_written_files() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.write_file("b.txt", "b").await.unwrap();
        store.write_file("a.txt", "a").await.unwrap();

        let nodes = store.snapshot_tree().await.unwrap();
        let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_status_on_empty_workspace() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let status = store.status().await.unwrap();
        assert!(!status.has_repository);
        assert_eq!(status.file_count, 0);
        assert_eq!(status.folder_count, 0);
        assert_eq!(status.workspace_root, store.workspace().root());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_program_in_workspace() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store
            .write_file("main.sh", "printf from-program\n")
            .await
            .unwrap();
        let output = store.run_program("main.sh").await.unwrap();
        assert!(output.succeeded);
        assert_eq!(output.text, "from-program");
    }

    #[tokio::test]
    async fn test_run_program_rejects_escaping_path() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let err = store.run_program("../main.sh").await.unwrap_err();
        assert!(matches!(err, WskError::PathEscape(_)));
    }

    #[tokio::test]
    async fn test_clone_repo_replaces_previous_contents() {
        if !git_available() {
            return;
        }
        let origin = TempDir::new().unwrap();
        let url = seed_origin(origin.path());

        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.write_file("stale.txt", "old state").await.unwrap();

        let nodes = store.clone_repo(&url).await.unwrap();
        let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["README.md", "src"]);
        assert!(!store.workspace().root().join("stale.txt").exists());
        assert!(store.workspace().has_repository());
    }

    #[tokio::test]
    async fn test_clone_repo_bad_origin_is_clone_failed() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let url = RepoUrl::try_new("file:///no/such/origin-repo").unwrap();

        let err = store.clone_repo(&url).await.unwrap_err();
        assert!(matches!(err, WskError::CloneFailed { .. }));
        assert!(err.to_string().starts_with("Failed to clone repository: "));
    }

    #[tokio::test]
    async fn test_commit_after_edit_and_nothing_to_commit() {
        if !git_available() {
            return;
        }
        let origin = TempDir::new().unwrap();
        let url = seed_origin(origin.path());

        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.clone_repo(&url).await.unwrap();

        // Commit identity for the freshly cloned repo
        let root = store.workspace().root().to_path_buf();
        git(&root, &["config", "user.email", "dev@example.com"]);
        git(&root, &["config", "user.name", "Dev"]);

        store.write_file("README.md", "# changed\n").await.unwrap();
        let result = store.commit("update readme").await.unwrap();
        assert!(result.succeeded, "commit output: {}", result.text);

        let again = store.commit("no changes").await.unwrap();
        assert!(!again.succeeded);
        assert!(again.text.contains("nothing to commit"));
    }
}
