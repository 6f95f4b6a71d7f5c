//! Workspace root management and sandboxed path resolution.
//!
//! A [`Workspace`] owns one canonicalized directory and is the only way to
//! turn user-supplied relative paths into absolute ones. Every resolution is
//! checked for confinement: `..` traversal and symlinks that point outside
//! the root are rejected before any I/O touches the target.

use crate::constants::VCS_DIR;
use crate::errors::WskError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Check if a path is a disk root (e.g. `/`, `C:\`).
fn is_disk_root(path: &Path) -> bool {
    #[cfg(windows)]
    {
        // On Windows, a root like C:\ has a parent of None
        path.parent().is_none()
    }
    #[cfg(not(windows))]
    {
        path == Path::new("/")
    }
}

/// Walk up from `path` to the nearest ancestor present on disk.
///
/// Used for symlink checks on paths whose tail has not been created yet.
/// Presence is checked with `symlink_metadata`, which does not follow
/// links, so a dangling symlink counts as present.
fn deepest_existing(path: &Path) -> &Path {
    for ancestor in path.ancestors() {
        if ancestor.symlink_metadata().is_ok() {
            return ancestor;
        }
    }
    // ancestors() always ends at the filesystem root, which exists
    path
}

// ============================================================================
// Workspace
// ============================================================================

/// A managed workspace directory on disk.
///
/// The root is created if absent and canonicalized once at construction;
/// all relative paths handed to [`Workspace::resolve`] are confined to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open (creating if necessary) the workspace rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`WskError::PathNotFound`] if the directory cannot be
    /// canonicalized after creation, and [`WskError::InvalidPath`] if the
    /// resolved root is not a directory or is a disk root.
    pub fn at(root: impl AsRef<Path>) -> Result<Self, WskError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;

        let canonical = root
            .canonicalize()
            .map_err(|_| WskError::PathNotFound(root.to_path_buf()))?;

        if !canonical.is_dir() {
            return Err(WskError::InvalidPath(format!(
                "`{}` is not a directory",
                canonical.display()
            )));
        }

        if is_disk_root(&canonical) {
            return Err(WskError::InvalidPath(format!(
                "refusing to manage the disk root `{}`",
                canonical.display()
            )));
        }

        Ok(Self { root: canonical })
    }

    /// The canonicalized workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the workspace currently holds a cloned repository.
    pub fn has_repository(&self) -> bool {
        self.root.join(VCS_DIR).is_dir()
    }

    /// Resolve a workspace-relative path to an absolute one inside the root.
    ///
    /// The input may carry a leading `/` (tree snapshot paths do); it is
    /// still interpreted relative to the root. Resolution is lexical first
    /// (`.` dropped, `..` popped, never past the root), then the deepest
    /// existing ancestor is canonicalized so a symlink cannot smuggle the
    /// target outside the sandbox. Dangling symlinks cannot be canonicalized
    /// and are rejected outright.
    ///
    /// # Errors
    ///
    /// Returns [`WskError::PathEscape`] if the path would land outside the
    /// workspace root.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, WskError> {
        let trimmed = relative.trim_start_matches('/');

        let mut resolved = self.root.clone();
        let mut depth: usize = 0;
        for component in Path::new(trimmed).components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::ParentDir => {
                    if depth == 0 {
                        return Err(WskError::PathEscape(relative.to_string()));
                    }
                    resolved.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(WskError::PathEscape(relative.to_string()));
                }
            }
        }

        // Symlink containment: canonicalize what exists of the path and make
        // sure it still sits under the (already canonical) root. A dangling
        // symlink has an unverifiable target and is rejected as an escape.
        let anchor = deepest_existing(&resolved);
        let anchored = match anchor.canonicalize() {
            Ok(path) => path,
            Err(_) if anchor.is_symlink() => {
                return Err(WskError::PathEscape(relative.to_string()));
            }
            Err(e) => return Err(WskError::Io(e)),
        };
        if !anchored.starts_with(&self.root) {
            return Err(WskError::PathEscape(relative.to_string()));
        }

        Ok(resolved)
    }
}

// ============================================================================
// RepoUrl
// ============================================================================

/// A validated repository URL.
///
/// Validation is deliberately loose (the version-control tool is the real
/// authority on what it can clone) but refuses values that could be mistaken
/// for tool flags or that embed whitespace or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoUrl(String);

impl RepoUrl {
    /// Create a validated repository URL. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`WskError::InvalidRepoUrl`] if the trimmed value is empty,
    /// starts with `-`, or contains whitespace or control characters.
    pub fn try_new(url: impl Into<String>) -> Result<Self, WskError> {
        let url = url.into();
        let trimmed = url.trim();
        if !is_valid_repo_url(trimmed) {
            return Err(WskError::InvalidRepoUrl(url));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Create without validation. Only for values already known to be valid.
    pub fn new_unchecked(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RepoUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Check whether a candidate string is acceptable as a repository URL.
fn is_valid_repo_url(url: &str) -> bool {
    !url.is_empty()
        && !url.starts_with('-')
        && !url.chars().any(|c| c.is_whitespace() || c.is_control())
}

// ============================================================================
// Tests
// ============================================================================
