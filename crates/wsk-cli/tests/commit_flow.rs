//! Integration tests for the stage-and-commit flow.
//!
//! All of these need a real `git`; they probe for it and return early on
//! hosts without one.

mod common;

use predicates::prelude::*;
use tempfile::TempDir;

use common::{git, git_available, seed_origin, wsk_cmd};

#[test]
fn test_commit_after_edit_creates_revision() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().expect("create temp dir");
    let url = seed_origin(&temp.path().join("origin"));
    let ws = temp.path().join("ws");

    wsk_cmd(&ws).args(["clone", &url]).assert().success();

    // Committing needs an identity; the clone does not carry one over.
    git(&ws, &["config", "user.email", "test@example.com"]);
    git(&ws, &["config", "user.name", "Test"]);

    wsk_cmd(&ws)
        .args(["write", "notes.md", "--text", "changed\n"])
        .assert()
        .success();

    wsk_cmd(&ws)
        .args(["commit", "-m", "add notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Committed staged changes"))
        .stdout(predicate::str::contains("add notes"));
}

#[test]
fn test_commit_with_clean_tree_exits_zero() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().expect("create temp dir");
    let url = seed_origin(&temp.path().join("origin"));
    let ws = temp.path().join("ws");

    wsk_cmd(&ws).args(["clone", &url]).assert().success();

    // A clean tree is not an error; the tool's answer is the result.
    wsk_cmd(&ws)
        .args(["commit", "-m", "noop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Commit did not create a revision"));
}

#[test]
fn test_terminal_commit_reaches_the_gateway() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().expect("create temp dir");
    let url = seed_origin(&temp.path().join("origin"));
    let ws = temp.path().join("ws");

    wsk_cmd(&ws).args(["clone", &url]).assert().success();
    git(&ws, &["config", "user.email", "test@example.com"]);
    git(&ws, &["config", "user.name", "Test"]);

    wsk_cmd(&ws)
        .args(["write", "notes.md", "--text", "changed\n"])
        .assert()
        .success();

    // The deferred result is drained before the one-shot exits, so git's
    // `[branch hash] subject` line lands on stdout.
    wsk_cmd(&ws)
        .args(["term", "-c", r#"git commit -m "via terminal""#])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"$ git commit -m "via terminal""#))
        .stdout(predicate::str::contains("] via terminal"));
}
