//! Time display helpers for the progress bar

/// Format milliseconds as `m:ss`
///
/// Whole seconds only (truncated), seconds zero-padded, minutes unbounded.
/// Negative or non-finite input renders as `0:00`.
pub fn format_time(ms: f64) -> String {
    let total_secs = if ms.is_finite() && ms > 0.0 {
        (ms / 1000.0).floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Position as a percentage of duration, in `[0, 100]`
///
/// Returns 0 while the duration is unknown.
pub fn progress_percent(current_ms: f64, duration_ms: f64) -> f64 {
    if !(duration_ms.is_finite() && duration_ms > 0.0) || !current_ms.is_finite() {
        return 0.0;
    }
    (current_ms / duration_ms * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(5_000.0), "0:05");
        assert_eq!(format_time(106_000.0), "1:46");
        assert_eq!(format_time(272_000.0), "4:32");
    }

    #[test]
    fn truncates_partial_seconds() {
        assert_eq!(format_time(59_999.0), "0:59");
        assert_eq!(format_time(60_000.0), "1:00");
    }

    #[test]
    fn minutes_are_unbounded() {
        assert_eq!(format_time(3_725_000.0), "62:05");
    }

    #[test]
    fn garbage_renders_as_zero() {
        assert_eq!(format_time(-1.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn progress() {
        assert_eq!(progress_percent(0.0, 0.0), 0.0);
        assert_eq!(progress_percent(2_500.0, 5_000.0), 50.0);
        assert_eq!(progress_percent(9_000.0, 5_000.0), 100.0);
        assert_eq!(progress_percent(1_000.0, f64::NAN), 0.0);
    }
}
