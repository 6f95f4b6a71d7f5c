//! Terminal log records.
//!
//! A terminal session's history is an append-only sequence of [`LogEntry`]
//! values: the commands a user typed and the output lines produced for
//! them. Rendering is left to the caller; [`LogEntry`]'s `Display` uses the
//! conventional `$ ` prefix for command entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a log entry records typed input or produced output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Command,
    Output,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogKind::Command => write!(f, "command"),
            LogKind::Output => write!(f, "output"),
        }
    }
}

impl FromStr for LogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "command" => Ok(LogKind::Command),
            "output" => Ok(LogKind::Output),
            other => Err(format!("Unknown log kind: {other}")),
        }
    }
}

/// One record in a terminal session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Command echo or output line.
    pub kind: LogKind,

    /// The recorded text, without any prompt decoration.
    pub text: String,
}

impl LogEntry {
    /// A command-echo entry.
    pub fn command(text: impl Into<String>) -> Self {
        Self {
            kind: LogKind::Command,
            text: text.into(),
        }
    }

    /// An output entry.
    pub fn output(text: impl Into<String>) -> Self {
        Self {
            kind: LogKind::Output,
            text: text.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LogKind::Command => write!(f, "$ {}", self.text),
            LogKind::Output => write!(f, "{}", self.text),
        }
    }
}
