//! # wsk CLI
//!
//! Command-line interface for the Workspace Sandbox Kit.
//!
//! This binary provides human-friendly access to `wsk-core` functionality.
//! Run `wsk --help` for usage information.

mod cli;
pub mod ui;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    cli::run().await
}
