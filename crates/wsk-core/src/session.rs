//! Terminal sessions.
//!
//! A [`TerminalSession`] owns one append-only log and sequences interpreter
//! dispatches against the shared [`WorkspaceStore`]. Commit follow-ups run
//! as background tasks: the session stays responsive while one is in
//! flight, and completed results are appended in completion order, not
//! submission order. Two overlapping commits may therefore interleave their
//! output with later commands; the pending count lets a UI surface that.

use crate::command::{interpret, FollowUp};
use crate::log::LogEntry;
use crate::store::WorkspaceStore;
use std::sync::Arc;
use tokio::task::JoinSet;
use uuid::Uuid;

const WELCOME_LINES: [&str; 2] = [
    "Welcome to the integrated terminal.",
    "You can run git commands or execute your code (e.g. 'node src/main.js').",
];

/// One interactive terminal over the shared workspace store.
pub struct TerminalSession {
    id: Uuid,
    store: Arc<WorkspaceStore>,
    log: Vec<LogEntry>,
    pending: JoinSet<LogEntry>,
}

impl TerminalSession {
    /// Start a session. The log opens with the welcome banner.
    pub fn new(store: Arc<WorkspaceStore>) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, "terminal session started");

        Self {
            id,
            store,
            log: WELCOME_LINES.iter().map(|l| LogEntry::output(*l)).collect(),
            pending: JoinSet::new(),
        }
    }

    /// Unique id of this session.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The full log, banner included.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Number of follow-ups still in flight.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Submit one input line and return the entries appended right away.
    ///
    /// Blank lines append nothing. `clear` empties the log and returns
    /// nothing. Run follow-ups execute before this returns (their output is
    /// part of the returned slice); commit follow-ups are spawned, and their
    /// output arrives later through [`TerminalSession::next_completed`].
    pub async fn submit(&mut self, line: &str) -> Vec<LogEntry> {
        let dispatch = interpret(line);

        if dispatch.reset_log {
            tracing::debug!(session = %self.id, "clearing terminal log");
            self.log.clear();
            return Vec::new();
        }

        let mut appended = dispatch.entries;
        match dispatch.follow_up {
            Some(FollowUp::Commit { message }) => {
                tracing::debug!(session = %self.id, message, "spawning commit follow-up");
                let store = Arc::clone(&self.store);
                self.pending.spawn(async move {
                    match store.commit(&message).await {
                        Ok(result) => LogEntry::output(result.text),
                        Err(e) => LogEntry::output(e.to_string()),
                    }
                });
            }
            Some(FollowUp::Run { program }) => {
                let entry = match self.store.run_program(&program).await {
                    Ok(output) => LogEntry::output(output.text),
                    Err(e) => LogEntry::output(e.to_string()),
                };
                appended.push(entry);
            }
            None => {}
        }

        self.log.extend(appended.iter().cloned());
        appended
    }

    /// Wait for the next finished follow-up and append its entry.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completed(&mut self) -> Option<LogEntry> {
        let entry = match self.pending.join_next().await? {
            Ok(entry) => entry,
            // A panicked task still owes the log an explanation
            Err(e) => LogEntry::output(format!("commit task failed: {e}")),
        };
        self.log.push(entry.clone());
        Some(entry)
    }

    /// Drain all in-flight follow-ups, returning their entries in
    /// completion order.
    pub async fn wait_idle(&mut self) -> Vec<LogEntry> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_completed().await {
            entries.push(entry);
        }
        entries
    }
}

// ============================================================================
// Tests
// ============================================================================
