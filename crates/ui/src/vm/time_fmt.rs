use chrono::Duration;

/// Countdown label as `MM:SS`; minutes keep growing past an hour.
#[must_use]
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_minutes_and_seconds() {
        assert_eq!(format_countdown(Duration::seconds(3600)), "60:00");
        assert_eq!(format_countdown(Duration::seconds(65)), "01:05");
        assert_eq!(format_countdown(Duration::seconds(-3)), "00:00");
    }
}
