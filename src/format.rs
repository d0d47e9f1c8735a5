//! Human-readable numbers and change descriptions.

use num_format::{Locale, ToFormattedString};

/// Format a count with thousands separators, e.g. `1234567.0` -> `1,234,567`.
/// Fractions are rounded to whole passengers.
pub fn format_count(v: f64) -> String {
    let rounded = v.round();
    if !rounded.is_finite() || rounded.abs() >= i64::MAX as f64 {
        return format!("{v}");
    }
    (rounded as i64).to_formatted_string(&Locale::en)
}

/// Describe a relative change as the slope chart summary does.
///
/// `0.12` -> `increased by 12%`, `-0.07` -> `decreased by 7%`, `0.0` -> `no change`.
pub fn describe_change(change: f64) -> String {
    if change == 0.0 {
        return "no change".to_string();
    }
    let pct = format_count(change.abs() * 100.0);
    if change > 0.0 {
        format!("increased by {pct}%")
    } else {
        format!("decreased by {pct}%")
    }
}
