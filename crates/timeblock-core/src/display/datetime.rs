//! Date, time and duration display utilities.

use std::fmt;

use jiff::{civil::Date, tz::TimeZone, Timestamp};

use crate::time::weekday_name;

/// A wrapper around `Timestamp` that formats it in the system time zone as
/// `YYYY-MM-DD HH:MM:SS TZ`.
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

/// Date with its weekday, e.g. `Monday 2025-01-20`.
pub struct DayHeading(pub Date);

impl fmt::Display for DayHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = weekday_name(self.0.weekday());
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        write!(f, " {}", self.0)
    }
}

/// A minute count rendered as `1h 30m`, `45m` or `2h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Minutes(pub u32);

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes) = (self.0 / 60, self.0 % 60);
        match (hours, minutes) {
            (0, m) => write!(f, "{m}m"),
            (h, 0) => write!(f, "{h}h"),
            (h, m) => write!(f, "{h}h {m}m"),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_minutes() {
        assert_eq!(Minutes(0).to_string(), "0m");
        assert_eq!(Minutes(45).to_string(), "45m");
        assert_eq!(Minutes(120).to_string(), "2h");
        assert_eq!(Minutes(90).to_string(), "1h 30m");
    }

    #[test]
    fn test_day_heading() {
        assert_eq!(DayHeading(date(2025, 1, 20)).to_string(), "Monday 2025-01-20");
    }
}
