//! Time formatting for court displays

/// Shown in place of a time when a court has no timer set
pub const BLANK_PLACEHOLDER: &str = "—";

/// Format a duration in milliseconds as `HH:MM:SS`.
///
/// Hours are not wrapped at 24 and grow past two digits if needed. Partial
/// seconds are truncated. `None` yields [`BLANK_PLACEHOLDER`].
pub fn format_millis(millis: Option<u64>) -> String {
    let Some(millis) = millis else {
        return BLANK_PLACEHOLDER.to_string();
    };

    let secs = millis / 1000;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_is_placeholder() {
        assert_eq!(format_millis(None), BLANK_PLACEHOLDER);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(format_millis(Some(0)), "00:00:00");
        assert_eq!(format_millis(Some(3_661_000)), "01:01:01");
        assert_eq!(format_millis(Some(5_400_000)), "01:30:00");
        assert_eq!(format_millis(Some(480_000)), "00:08:00");
    }

    #[test]
    fn test_truncates_partial_seconds() {
        assert_eq!(format_millis(Some(999)), "00:00:00");
        assert_eq!(format_millis(Some(479_999)), "00:07:59");
    }

    #[test]
    fn test_hours_are_not_wrapped() {
        assert_eq!(format_millis(Some(25 * 3_600_000)), "25:00:00");
        assert_eq!(format_millis(Some(100 * 3_600_000 + 59_000)), "100:00:59");
    }
}
