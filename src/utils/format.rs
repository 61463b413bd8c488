//! Human-readable formatting utilities.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Format byte size as human-readable string (1024-based).
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let size = bytes as f64;
    if size >= MB {
        format!("{:.1} MB", size / MB)
    } else if size >= KB {
        format!("{:.1} KB", size / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a timestamp as `YYYY/MM/DD` in local time.
pub fn format_date(created: &DateTime<Utc>) -> String {
    format_date_in(created, &Local)
}

fn format_date_in<Tz: TimeZone>(created: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    created.with_timezone(tz).format("%Y/%m/%d").to_string()
}

/// Truncate to at most `max` characters, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
