//! # wsk-core
//!
//! **Workspace Sandbox Kit** – core engine library.
//!
//! This crate owns one sandboxed workspace directory and everything that
//! happens inside it: clone-based population, file reads and writes, the
//! file-tree projection, commit handling, program execution, and the
//! terminal command interpreter. It is designed to be consumed by the `wsk`
//! CLI and other Rust tools.
//!
//! ## Main Types
//!
//! - [`WorkspaceStore`] – the main entry point for all workspace operations
//! - [`Workspace`] – one canonicalized, sandboxed root directory
//! - [`TerminalSession`] – terminal log plus interpreter sequencing
//! - [`WskError`] – domain-specific error type
//!
//! ## Modules
//!
//! - [`command`] – terminal line parsing and dispatch planning
//! - [`config`] – global configuration (`~/.wsk/config.yaml`)
//! - [`session`] – terminal sessions and deferred follow-ups
//! - [`store`] – the serialized workspace operations
//! - [`tree`] – file-tree snapshots
//! - [`vcs`] – the version-control gateway
//! - [`workspace`] – root management and sandboxed path resolution
//!
//! ## Example
//!
//! ```ignore
//! use wsk_core::{RepoUrl, WorkspaceStore};
//!
//! // Open a store over ./workspace with the default configuration
//! let store = WorkspaceStore::with_defaults("workspace")?;
//!
//! // Populate it from a repository and list what arrived
//! let url = RepoUrl::try_new("https://github.com/acme/site.git")?;
//! let tree = store.clone_repo(&url).await?;
//! println!("{} top-level entries", tree.len());
//!
//! // Edit and commit
//! store.write_file("README.md", "# hello\n").await?;
//! let result = store.commit("update readme").await?;
//! println!("{}", result.text);
//! ```

// Modules
pub mod command;
pub mod config;
pub mod constants;
pub mod errors;
pub mod log;
mod process;
pub mod runner;
pub mod session;
pub mod store;
pub mod tree;
pub mod vcs;
pub mod workspace;

// Re-exports for convenience
pub use command::{interpret, parse_command, Dispatch, FollowUp, TerminalCommand};
pub use config::{GlobalConfig, RunnerConfig, VcsConfig, WorkspaceConfig};
pub use errors::WskError;
pub use log::{LogEntry, LogKind};
pub use runner::{ProgramRunner, RunOutput};
pub use session::TerminalSession;
pub use store::{WorkspaceStatus, WorkspaceStore};
pub use tree::{count_nodes, snapshot, FileNode, FileNodeKind};
pub use vcs::{VcsCommandResult, VcsGateway};
pub use workspace::{RepoUrl, Workspace};
