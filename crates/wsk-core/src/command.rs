//! Terminal command parsing and dispatch planning.
//!
//! One raw input line parses into a closed [`TerminalCommand`] variant and
//! [`interpret`] turns that into a [`Dispatch`]: the log entries to append
//! now, plus at most one [`FollowUp`] that needs the workspace store. Both
//! steps are pure; all I/O belongs to the session and store layers.
//!
//! `git status`, `git pull`, `git push` and `ls` answer with fixed,
//! context-free strings. They are terminal affordances, not state queries;
//! real workspace state flows through the store operations.

use crate::log::LogEntry;
use regex::Regex;
use std::sync::OnceLock;

// ============================================================================
// Canned outputs
// ============================================================================

const GIT_STATUS_OUTPUT: &str = "On branch main. Your branch is up to date with 'origin/main'.\nNothing to commit, working tree clean.";
const GIT_PULL_OUTPUT: &str = "Already up to date.";
const GIT_PUSH_OUTPUT: &str = "Everything up-to-date.";
const LS_OUTPUT: &str = "public/\nsrc/\npackage.json\nREADME.md";
const INVALID_COMMIT_OUTPUT: &str = "Invalid commit command. Use: git commit -m \"<message>\"";

// ============================================================================
// Parsing
// ============================================================================

/// One parsed terminal input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Blank input; nothing happens.
    Empty,

    /// `clear`: wipe the log.
    Clear,

    /// `git commit -m "<message>"`: a real commit against the workspace.
    Commit { message: String },

    /// A line starting with `git commit` that does not match the commit
    /// pattern. Reported inline; never reaches the version-control gateway.
    InvalidCommit { line: String },

    /// `git status` (canned output).
    Status,

    /// `git pull` (canned output).
    Pull,

    /// `git push` (canned output).
    Push,

    /// `ls` (canned output).
    List,

    /// `node <path>`: execute a workspace program.
    Run { program: String },

    /// Anything else.
    Unknown { line: String },
}

static COMMIT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn commit_pattern() -> &'static Regex {
    COMMIT_PATTERN
        .get_or_init(|| Regex::new(r#"^git commit -m "(.*)"$"#).expect("commit pattern compiles"))
}

/// Parse one raw input line into a [`TerminalCommand`].
///
/// The line is trimmed first. Commit syntax is checked before the literal
/// table so a malformed commit line surfaces as [`TerminalCommand::InvalidCommit`]
/// instead of falling through to "command not found".
pub fn parse_command(line: &str) -> TerminalCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return TerminalCommand::Empty;
    }
    if trimmed == "clear" {
        return TerminalCommand::Clear;
    }

    if trimmed.starts_with("git commit") {
        return match commit_pattern().captures(trimmed) {
            Some(caps) => TerminalCommand::Commit {
                message: caps[1].to_string(),
            },
            None => TerminalCommand::InvalidCommit {
                line: trimmed.to_string(),
            },
        };
    }

    match trimmed {
        "git status" => return TerminalCommand::Status,
        "git pull" => return TerminalCommand::Pull,
        "git push" => return TerminalCommand::Push,
        "ls" => return TerminalCommand::List,
        _ => {}
    }

    let mut parts = trimmed.split_whitespace();
    if parts.next() == Some("node") {
        if let (Some(program), None) = (parts.next(), parts.next()) {
            return TerminalCommand::Run {
                program: program.to_string(),
            };
        }
    }

    TerminalCommand::Unknown {
        line: trimmed.to_string(),
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Work a dispatched line requires from the workspace store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    /// Stage everything, then commit with the message.
    Commit { message: String },

    /// Execute the program at the workspace-relative path.
    Run { program: String },
}

/// The planned effect of one input line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Wipe the log before appending anything.
    pub reset_log: bool,

    /// Entries to append immediately.
    pub entries: Vec<LogEntry>,

    /// Store-touching work, if any.
    pub follow_up: Option<FollowUp>,
}

/// Plan the effect of one raw input line. Pure; no I/O happens here.
///
/// Every non-empty, non-clear line gets a command-echo entry. Recognized
/// literals additionally get their canned output; unknown lines get
/// `command not found: <line>`; commit and run lines carry a [`FollowUp`]
/// instead of an immediate output entry.
pub fn interpret(line: &str) -> Dispatch {
    match parse_command(line) {
        TerminalCommand::Empty => Dispatch::default(),
        TerminalCommand::Clear => Dispatch {
            reset_log: true,
            ..Dispatch::default()
        },
        TerminalCommand::Commit { message } => Dispatch {
            entries: vec![LogEntry::command(line.trim())],
            follow_up: Some(FollowUp::Commit { message }),
            ..Dispatch::default()
        },
        TerminalCommand::InvalidCommit { line } => Dispatch {
            entries: vec![
                LogEntry::command(line),
                LogEntry::output(INVALID_COMMIT_OUTPUT),
            ],
            ..Dispatch::default()
        },
        TerminalCommand::Status => canned(line, GIT_STATUS_OUTPUT),
        TerminalCommand::Pull => canned(line, GIT_PULL_OUTPUT),
        TerminalCommand::Push => canned(line, GIT_PUSH_OUTPUT),
        TerminalCommand::List => canned(line, LS_OUTPUT),
        TerminalCommand::Run { program } => Dispatch {
            entries: vec![LogEntry::command(line.trim())],
            follow_up: Some(FollowUp::Run { program }),
            ..Dispatch::default()
        },
        TerminalCommand::Unknown { line } => Dispatch {
            entries: vec![
                LogEntry::command(line.clone()),
                LogEntry::output(format!("command not found: {line}")),
            ],
            ..Dispatch::default()
        },
    }
}

fn canned(line: &str, output: &str) -> Dispatch {
    Dispatch {
        entries: vec![LogEntry::command(line.trim()), LogEntry::output(output)],
        ..Dispatch::default()
    }
}

// ============================================================================
// Tests
// ============================================================================
