//! Shared test utilities for wsk-cli integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;

/// Get a Command for the wsk binary, pinned to `workspace` and isolated
/// from any host-level WSK configuration.
///
/// # Panics
///
/// Panics if the wsk binary cannot be found. This should not happen
/// in a properly configured test environment.
#[allow(deprecated)]
pub fn wsk_cmd(workspace: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wsk").expect("wsk binary should exist");
    cmd.arg("--workspace").arg(workspace);
    // A config path that does not exist makes the built-in defaults apply
    // no matter what the host has in ~/.wsk/config.yaml.
    cmd.env("WSK_CONFIG", workspace.with_file_name("no-config.yaml"));
    cmd.env_remove("WSK_VERBOSE");
    cmd.env_remove("WSK_QUIET");
    cmd.env_remove("WSK_WORKSPACE");
    cmd.env_remove("WSK_COLOR");
    cmd
}

/// True when a usable `git` is on the PATH.
///
/// Tests that need real repositories call this first and return early when
/// it fails, so the suite still passes on minimal hosts.
pub fn git_available() -> bool {
    StdCommand::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Run git in `dir` for fixture setup, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let out = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("spawn git");
    assert!(
        out.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
}

/// Build a small origin repository under `dir` and return its `file://` URL.
///
/// The repo carries a top-level README and a `src/` folder so clone tests
/// have both node kinds to look at.
pub fn seed_origin(dir: &Path) -> String {
    std::fs::create_dir_all(dir).expect("create origin dir");
    git(dir, &["init"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);

    std::fs::write(dir.join("README.md"), "# Demo\n").expect("write README");
    std::fs::create_dir_all(dir.join("src")).expect("create src");
    std::fs::write(dir.join("src").join("main.js"), "console.log('hi');\n")
        .expect("write main.js");

    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", "initial"]);

    format!("file://{}", dir.display())
}
