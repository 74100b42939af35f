//! Time-of-day helpers shared by the scheduler, validator and models.
//!
//! Times of day are carried as strict `HH:MM` strings at minute resolution
//! and compared as minute offsets from midnight. Intervals are half-open:
//! `[start, end)`.

use jiff::{
    civil::{Date, DateTime, Weekday},
    ToSpan,
};

/// Size of a scheduling slot in minutes.
pub const SLOT_MINUTES: u32 = 15;

/// Minutes in a day; valid offsets are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Converts an `HH:MM` string into minutes since midnight.
///
/// Malformed input (wrong length, non-digits, missing colon) yields `0`.
/// Callers that must reject bad input check [`is_valid_hhmm`] first.
pub fn to_minutes(s: &str) -> u32 {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return 0;
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return 0;
    }
    let hours = u32::from(digits[0] - b'0') * 10 + u32::from(digits[1] - b'0');
    let minutes = u32::from(digits[2] - b'0') * 10 + u32::from(digits[3] - b'0');
    let total = hours * 60 + minutes;
    if hours > 23 || minutes > 59 {
        0
    } else {
        total
    }
}

/// Strict `HH:MM` check: five bytes, 24-hour clock, zero padded.
pub fn is_valid_hhmm(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let hours = (digits[0] - b'0') * 10 + (digits[1] - b'0');
    let minutes = (digits[2] - b'0') * 10 + (digits[3] - b'0');
    hours <= 23 && minutes <= 59
}

/// True when `[s1, e1)` and `[s2, e2)` share at least one minute.
pub fn overlaps(s1: u32, e1: u32, s2: u32, e2: u32) -> bool {
    s1 < e2 && s2 < e1
}

/// Formats minutes since midnight as `HH:MM`, clamped to `23:59`.
pub fn format_minutes(minutes: u32) -> String {
    let minutes = minutes.min(MINUTES_PER_DAY - 1);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Rounds up to the next slot boundary; boundaries map to themselves.
pub fn round_up_to_slot(minutes: u32) -> u32 {
    minutes.div_ceil(SLOT_MINUTES) * SLOT_MINUTES
}

/// Rounds to the nearest slot boundary, halves rounding up.
pub fn round_to_slot(minutes: u32) -> u32 {
    (minutes + SLOT_MINUTES / 2) / SLOT_MINUTES * SLOT_MINUTES
}

/// Minutes since midnight of a civil date-time, seconds truncated.
pub fn minute_of_day(dt: DateTime) -> u32 {
    // hour/minute are always within 0..24 / 0..60
    u32::from(dt.hour().unsigned_abs()) * 60 + u32::from(dt.minute().unsigned_abs())
}

/// Shifts a date by whole days, saturating at the supported range.
pub fn add_days(date: Date, days: i64) -> Date {
    date.saturating_add(days.days())
}

/// Parses a strict `YYYY-MM-DD` date.
///
/// jiff alone accepts a few other ISO 8601 spellings; the shape is checked
/// first so only the canonical form gets through.
pub fn parse_date(s: &str) -> Option<Date> {
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    s.parse::<Date>().ok()
}

/// Weekdays in Monday-first order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

/// Lowercase English name of a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "monday",
        Weekday::Tuesday => "tuesday",
        Weekday::Wednesday => "wednesday",
        Weekday::Thursday => "thursday",
        Weekday::Friday => "friday",
        Weekday::Saturday => "saturday",
        Weekday::Sunday => "sunday",
    }
}

/// Parses a weekday from its full or three-letter English name, ignoring case.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let name = name.trim().to_ascii_lowercase();
    WEEKDAYS.into_iter().find(|&day| {
        let full = weekday_name(day);
        name == full || name == full[..3]
    })
}

/// Monday-zero index of a weekday, `0..7`.
pub fn weekday_index(weekday: Weekday) -> usize {
    usize::from(weekday.to_monday_zero_offset().unsigned_abs())
}
