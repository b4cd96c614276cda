//! Timestamp display in the system timezone.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a stored UTC timestamp as `YYYY-MM-DD HH:MM:SS TZ` in the
/// system timezone.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_date_time_shape() {
        let ts: Timestamp = "2024-03-01T12:30:45Z".parse().unwrap();
        let rendered = LocalDateTime(&ts).to_string();
        // Date, time and zone abbreviation separated by spaces.
        assert_eq!(rendered.split(' ').count(), 3, "{rendered}");
        assert!(rendered.starts_with("2024-03-0"), "{rendered}");
    }
}
