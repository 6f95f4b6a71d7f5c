//! File-tree projection of a workspace.
//!
//! [`snapshot`] walks a directory recursively and produces a nested
//! [`FileNode`] structure suitable for serialization. Version-control
//! metadata (`.git`) is excluded, siblings are name-sorted so two snapshots
//! of the same tree always compare equal, and every node path is the parent
//! path plus `/` plus the node name, rooted at `/`.

use crate::constants::VCS_DIR;
use crate::errors::WskError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// Types
// ============================================================================

/// Whether a node is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileNodeKind {
    File,
    Folder,
}

impl fmt::Display for FileNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileNodeKind::File => write!(f, "file"),
            FileNodeKind::Folder => write!(f, "folder"),
        }
    }
}

impl FromStr for FileNodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(FileNodeKind::File),
            "folder" => Ok(FileNodeKind::Folder),
            other => Err(format!("Unknown file node kind: {other}")),
        }
    }
}

/// One entry in a file-tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    /// Base name of the entry.
    pub name: String,

    /// Workspace-relative path with a leading `/`.
    pub path: String,

    /// File or folder.
    #[serde(rename = "type")]
    pub kind: FileNodeKind,

    /// Child nodes. Present (possibly empty) for folders, absent for files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Take a file-tree snapshot of the directory at `root`.
///
/// An empty directory yields an empty vector. Symlinks are recorded as files
/// and never followed, so the walk cannot cycle or wander outside the root.
pub fn snapshot(root: &Path) -> Result<Vec<FileNode>, WskError> {
    walk_dir(root, "")
}

fn walk_dir(dir: &Path, prefix: &str) -> Result<Vec<FileNode>, WskError> {
    let mut nodes = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == VCS_DIR {
            continue;
        }

        let path = format!("{prefix}/{name}");
        if entry.file_type()?.is_dir() {
            let children = walk_dir(&entry.path(), &path)?;
            nodes.push(FileNode {
                name,
                path,
                kind: FileNodeKind::Folder,
                children: Some(children),
            });
        } else {
            nodes.push(FileNode {
                name,
                path,
                kind: FileNodeKind::File,
                children: None,
            });
        }
    }

    // read_dir order is platform-dependent; sort for a stable projection
    nodes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(nodes)
}

/// Count files and folders across a snapshot, recursively.
///
/// Returns `(files, folders)`.
pub fn count_nodes(nodes: &[FileNode]) -> (usize, usize) {
    let mut files = 0;
    let mut folders = 0;
    for node in nodes {
        match node.kind {
            FileNodeKind::File => files += 1,
            FileNodeKind::Folder => {
                folders += 1;
                if let Some(children) = &node.children {
                    let (f, d) = count_nodes(children);
                    files += f;
                    folders += d;
                }
            }
        }
    }
    (files, folders)
}

// ============================================================================
// Tests
// ============================================================================
