//! Progress indicators for long-running CLI operations.
//!
//! Provides spinners using `indicatif`. Progress indicators respect color
//! settings and are disabled when stdout is not a TTY or when `--quiet`
//! mode is enabled. Clone and commit are the slow operations here; both run
//! an external tool whose duration we cannot predict, so all spinners are
//! indeterminate.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::color::ColorMode;

/// Progress feedback mode based on output context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Interactive TTY: show animated spinners
    Interactive,
    /// Non-TTY or quiet: suppress progress, show only final results
    Quiet,
    /// Machine-readable: no progress at all (for --json)
    Silent,
}

impl ProgressMode {
    /// Detect the appropriate mode from environment and flags.
    pub fn detect(quiet: bool, json: bool, color_mode: ColorMode) -> Self {
        if json {
            Self::Silent
        } else if quiet || !atty::is(atty::Stream::Stdout) {
            Self::Quiet
        } else if color_mode.is_enabled() || atty::is(atty::Stream::Stdout) {
            Self::Interactive
        } else {
            Self::Quiet
        }
    }

    /// Check if progress should be shown.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Interactive)
    }
}

/// Spinner tick characters (Braille-based).
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// A progress indicator that wraps indicatif.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Create a spinner for indeterminate operations.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let progress = Progress::spinner("Cloning repository...", mode);
    /// // ... do work ...
    /// progress.finish_clear();
    /// ```
    pub fn spinner(message: &str, mode: ProgressMode) -> Self {
        let bar = if mode.is_interactive() {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .tick_chars(SPINNER_CHARS)
                    .template("{spinner:.cyan} {msg} ({elapsed})")
                    .expect("valid template"),
            );
            pb.set_message(message.to_string());
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        } else {
            // Hidden progress bar for quiet/silent mode
            ProgressBar::hidden()
        };

        Self { bar }
    }

    /// Finish and clear the progress line.
    pub fn finish_clear(&self) {
        self.bar.finish_and_clear();
    }
}
