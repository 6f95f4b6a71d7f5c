//! Formatting utilities for CLI output.

use chrono::{DateTime, Utc};

/// Format a timestamp as relative time (e.g., "5 mins ago", "3d ago").
///
/// - Less than 1 minute: "just now"
/// - Less than 1 hour: "5 mins ago"
/// - Less than 24 hours: "3h ago"
/// - Less than 7 days: "2d ago"
/// - Older (or in the future): "2025-01-15"
pub fn format_relative_time(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    if duration.num_seconds() < 0 {
        // Future timestamp
        return timestamp.format("%Y-%m-%d").to_string();
    }

    if duration.num_minutes() < 1 {
        "just now".to_string()
    } else if duration.num_hours() < 1 {
        format!("{} mins ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}
