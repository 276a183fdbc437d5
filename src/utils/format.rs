//! Format - Formatting Utilities

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Format a UTC datetime in local time, e.g. "Mar 5, 2026 14:03"
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = dt.with_timezone(&Local);
    local.format("%b %-d, %Y %H:%M").to_string()
}

/// Format a calendar date as ISO `YYYY-MM-DD`
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Coarse age relative to `now`: "just now", "5m ago", "3h ago", "2d ago".
/// Future timestamps read as "just now".
pub fn format_relative(dt: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let minutes = (*now - *dt).num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

/// Truncate a string to max characters with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

/// Format a number with thousand separators
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        result.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a measurement with separators and one decimal, e.g. "12,480.5 kg"
pub fn format_quantity(value: f64, unit: &str) -> String {
    let tenths = (value * 10.0).round() as i64;
    let whole = format_number(tenths / 10);
    let sign = if tenths < 0 && tenths / 10 == 0 { "-" } else { "" };
    format!("{sign}{whole}.{} {unit}", (tenths % 10).abs())
}
