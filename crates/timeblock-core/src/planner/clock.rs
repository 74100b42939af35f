//! Source of the current wall-clock time.

use jiff::{civil::DateTime, Zoned};

/// Supplies "now" as a civil date-time in the user's time zone.
///
/// The planner reads it once per planning call; every "today" comparison in
/// that call uses the same value.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime;
}

/// Wall clock in the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        Zoned::now().datetime()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime);

impl Clock for FixedClock {
    fn now(&self) -> DateTime {
        self.0
    }
}
