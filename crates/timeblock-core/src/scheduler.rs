//! Workday and work-hour arithmetic.

use jiff::civil::{Date, DateTime, Weekday};
use serde::Serialize;
use thiserror::Error;

use crate::{
    error::{Result, ScheduleError},
    models::PeakHours,
    time::{
        add_days, format_minutes, is_valid_hhmm, minute_of_day, parse_weekday, round_up_to_slot,
        to_minutes, weekday_index, weekday_name, WEEKDAYS,
    },
};

/// Earliest place a new block can go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextSlot {
    pub date: Date,
    /// First free start, `HH:MM`
    pub start: String,
    /// End of the working day, `HH:MM`
    pub end: String,
}

/// Why a proposed slot does not fit the working hours.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotViolation {
    #[error("{date} is a {weekday}, which is not a workday")]
    NotWorkday { date: Date, weekday: &'static str },

    #[error("start {start} is not before end {end}")]
    StartNotBeforeEnd { start: String, end: String },

    #[error("start {start} is before the working day begins at {day_start}")]
    BeforeDayStart { start: String, day_start: String },

    #[error("end {end} is after the working day ends at {day_end}")]
    AfterDayEnd { end: String, day_end: String },
}

/// Snapshot of the scheduling situation handed to the planner prompt.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulingContext {
    pub now: DateTime,
    pub today: Date,
    pub weekday: &'static str,
    pub is_workday: bool,
    pub workdays: Vec<&'static str>,
    pub day_start: String,
    pub day_end: String,
    pub peak_hours: Option<PeakHours>,
    pub next_slot: NextSlot,
}

/// Working-hours calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    /// Monday-first workday flags
    workdays: [bool; 7],
    day_start: u32,
    day_end: u32,
    peak: Option<PeakHours>,
}

fn configuration(message: impl Into<String>) -> ScheduleError {
    ScheduleError::Configuration {
        message: message.into(),
    }
}

impl Scheduler {
    /// Builds a scheduler from weekday names and `HH:MM` bounds.
    ///
    /// Names are matched case-insensitively in full or three-letter form.
    /// An empty list is allowed; [`next_available_start`] then falls back to
    /// the next calendar day.
    ///
    /// [`next_available_start`]: Scheduler::next_available_start
    pub fn new<S: AsRef<str>>(
        workdays: &[S],
        day_start: &str,
        day_end: &str,
        peak: Option<PeakHours>,
    ) -> Result<Self> {
        let mut flags = [false; 7];
        for name in workdays {
            let name = name.as_ref();
            let day = parse_weekday(name)
                .ok_or_else(|| configuration(format!("Unknown workday '{name}'")))?;
            flags[weekday_index(day)] = true;
        }

        for (label, value) in [("day_start", day_start), ("day_end", day_end)] {
            if !is_valid_hhmm(value) {
                return Err(configuration(format!(
                    "{label} '{value}' is not a valid HH:MM time"
                )));
            }
        }
        let (start, end) = (to_minutes(day_start), to_minutes(day_end));
        if end <= start {
            return Err(configuration(format!(
                "day_end {day_end} must be after day_start {day_start}"
            )));
        }

        if let Some(peak) = &peak {
            if !is_valid_hhmm(&peak.start)
                || !is_valid_hhmm(&peak.end)
                || to_minutes(&peak.end) <= to_minutes(&peak.start)
            {
                return Err(configuration(format!(
                    "peak_hours {}-{} is not a valid HH:MM range",
                    peak.start, peak.end
                )));
            }
        }

        Ok(Self {
            workdays: flags,
            day_start: start,
            day_end: end,
            peak,
        })
    }

    pub fn is_workday(&self, date: Date) -> bool {
        self.workdays[weekday_index(date.weekday())]
    }

    /// Configured workdays in Monday-first order.
    pub fn workday_names(&self) -> Vec<&'static str> {
        WEEKDAYS
            .into_iter()
            .filter(|&day| self.workdays[weekday_index(day)])
            .map(weekday_name)
            .collect()
    }

    pub fn day_start(&self) -> String {
        format_minutes(self.day_start)
    }

    pub fn day_end(&self) -> String {
        format_minutes(self.day_end)
    }

    pub fn peak_hours(&self) -> Option<&PeakHours> {
        self.peak.as_ref()
    }

    fn slot_at(&self, date: Date, start: u32) -> NextSlot {
        NextSlot {
            date,
            start: format_minutes(start),
            end: format_minutes(self.day_end),
        }
    }

    /// Earliest start at or after `now` inside working hours.
    pub fn next_available_start(&self, now: DateTime) -> NextSlot {
        let today = now.date();
        if !self.workdays.contains(&true) {
            return self.slot_at(add_days(today, 1), self.day_start);
        }

        if self.is_workday(today) {
            let minute = minute_of_day(now);
            if minute < self.day_start {
                return self.slot_at(today, self.day_start);
            }
            let rounded = round_up_to_slot(minute);
            if rounded < self.day_end {
                return self.slot_at(today, rounded);
            }
        }

        (1..=7)
            .map(|offset| add_days(today, offset))
            .find(|&date| self.is_workday(date))
            .map(|date| self.slot_at(date, self.day_start))
            .unwrap_or_else(|| self.slot_at(add_days(today, 1), self.day_start))
    }

    /// True when a block of `duration` minutes starting at `start` fits the
    /// working hours of a workday.
    pub fn can_fit(&self, date: Date, start: &str, duration: u32) -> bool {
        self.is_workday(date) && self.can_fit_any_day(start, duration)
    }

    /// Like [`Scheduler::can_fit`] without the workday check.
    pub fn can_fit_any_day(&self, start: &str, duration: u32) -> bool {
        let start = to_minutes(start);
        start >= self.day_start
            && start < self.day_end
            && start
                .checked_add(duration)
                .is_some_and(|end| end <= self.day_end)
    }

    pub fn validate_slot(
        &self,
        date: Date,
        start: &str,
        end: &str,
    ) -> std::result::Result<(), SlotViolation> {
        if !self.is_workday(date) {
            return Err(SlotViolation::NotWorkday {
                date,
                weekday: weekday_name(date.weekday()),
            });
        }
        self.validate_slot_any_day(start, end)
    }

    pub fn validate_slot_any_day(
        &self,
        start: &str,
        end: &str,
    ) -> std::result::Result<(), SlotViolation> {
        let (s, e) = (to_minutes(start), to_minutes(end));
        if s >= e {
            return Err(SlotViolation::StartNotBeforeEnd {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        if s < self.day_start {
            return Err(SlotViolation::BeforeDayStart {
                start: start.to_string(),
                day_start: self.day_start(),
            });
        }
        if e > self.day_end {
            return Err(SlotViolation::AfterDayEnd {
                end: end.to_string(),
                day_end: self.day_end(),
            });
        }
        Ok(())
    }

    pub fn context(&self, now: DateTime) -> SchedulingContext {
        let today = now.date();
        SchedulingContext {
            now,
            today,
            weekday: weekday_name(today.weekday()),
            is_workday: self.is_workday(today),
            workdays: self.workday_names(),
            day_start: self.day_start(),
            day_end: self.day_end(),
            peak_hours: self.peak.clone(),
            next_slot: self.next_available_start(now),
        }
    }
}

impl Default for Scheduler {
    /// Monday to Friday, 09:00 to 17:00, no peak hours.
    fn default() -> Self {
        let mut workdays = [false; 7];
        for day in [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
        ] {
            workdays[weekday_index(day)] = true;
        }
        Self {
            workdays,
            day_start: 9 * 60,
            day_end: 17 * 60,
            peak: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, datetime};

    use super::*;

    fn weekdays() -> Scheduler {
        Scheduler::new(
            &["Mon", "tue", "Wednesday", "THU", "fri"],
            "09:00",
            "17:00",
            None,
        )
        .unwrap()
    }

    // 2025-01-20 is a Monday

    #[test]
    fn test_before_day_start_returns_day_start() {
        let slot = weekdays().next_available_start(datetime(2025, 1, 20, 7, 30, 0, 0));
        assert_eq!(slot.date, date(2025, 1, 20));
        assert_eq!(slot.start, "09:00");
        assert_eq!(slot.end, "17:00");
    }

    #[test]
    fn test_within_hours_rounds_up_to_slot() {
        let slot = weekdays().next_available_start(datetime(2025, 1, 20, 10, 23, 0, 0));
        assert_eq!(slot.date, date(2025, 1, 20));
        assert_eq!(slot.start, "10:30");

        let on_boundary = weekdays().next_available_start(datetime(2025, 1, 20, 10, 45, 0, 0));
        assert_eq!(on_boundary.start, "10:45");
    }

    #[test]
    fn test_after_hours_moves_to_next_workday() {
        let slot = weekdays().next_available_start(datetime(2025, 1, 20, 18, 0, 0, 0));
        assert_eq!(slot.date, date(2025, 1, 21));
        assert_eq!(slot.start, "09:00");
    }

    #[test]
    fn test_rounding_into_day_end_falls_through() {
        let slot = weekdays().next_available_start(datetime(2025, 1, 20, 16, 50, 0, 0));
        assert_eq!(slot.date, date(2025, 1, 21));
        assert_eq!(slot.start, "09:00");
    }

    #[test]
    fn test_weekend_moves_to_monday() {
        let slot = weekdays().next_available_start(datetime(2025, 1, 25, 11, 0, 0, 0));
        assert_eq!(slot.date, date(2025, 1, 27));
        assert_eq!(slot.start, "09:00");

        let friday_evening = weekdays().next_available_start(datetime(2025, 1, 24, 20, 0, 0, 0));
        assert_eq!(friday_evening.date, date(2025, 1, 27));
    }

    #[test]
    fn test_empty_workdays_fall_back_to_tomorrow() {
        let scheduler = Scheduler::new::<&str>(&[], "09:00", "17:00", None).unwrap();
        let slot = scheduler.next_available_start(datetime(2025, 1, 20, 7, 0, 0, 0));
        assert_eq!(slot.date, date(2025, 1, 21));
        assert_eq!(slot.start, "09:00");
    }

    #[test]
    fn test_new_rejects_bad_configuration() {
        assert!(matches!(
            Scheduler::new(&["funday"], "09:00", "17:00", None),
            Err(ScheduleError::Configuration { .. })
        ));
        assert!(Scheduler::new(&["mon"], "9:00", "17:00", None).is_err());
        assert!(Scheduler::new(&["mon"], "17:00", "09:00", None).is_err());
        let peak = PeakHours {
            start: "11:00".to_string(),
            end: "10:00".to_string(),
        };
        assert!(Scheduler::new(&["mon"], "09:00", "17:00", Some(peak)).is_err());
    }

    #[test]
    fn test_can_fit() {
        let s = weekdays();
        assert!(s.can_fit(date(2025, 1, 20), "09:00", 60));
        assert!(s.can_fit(date(2025, 1, 20), "16:00", 60));
        assert!(!s.can_fit(date(2025, 1, 20), "16:30", 60));
        assert!(!s.can_fit(date(2025, 1, 20), "08:45", 30));
        assert!(!s.can_fit(date(2025, 1, 25), "10:00", 30));
        assert!(s.can_fit_any_day("10:00", 30));
        assert!(!s.can_fit_any_day("09:00", u32::MAX));
    }

    #[test]
    fn test_validate_slot_reasons() {
        let s = weekdays();
        assert_eq!(s.validate_slot(date(2025, 1, 20), "09:00", "10:00"), Ok(()));

        let err = s
            .validate_slot(date(2025, 1, 25), "09:00", "10:00")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "2025-01-25 is a saturday, which is not a workday"
        );

        assert!(matches!(
            s.validate_slot_any_day("10:00", "10:00"),
            Err(SlotViolation::StartNotBeforeEnd { .. })
        ));
        assert!(matches!(
            s.validate_slot_any_day("08:00", "10:00"),
            Err(SlotViolation::BeforeDayStart { .. })
        ));
        assert!(matches!(
            s.validate_slot_any_day("16:00", "17:30"),
            Err(SlotViolation::AfterDayEnd { .. })
        ));
        assert_eq!(s.validate_slot_any_day("09:00", "10:00"), Ok(()));
    }

    #[test]
    fn test_default_matches_weekday_configuration() {
        assert_eq!(Scheduler::default(), weekdays());
        assert_eq!(
            Scheduler::default().workday_names(),
            vec!["monday", "tuesday", "wednesday", "thursday", "friday"]
        );
    }

    #[test]
    fn test_context() {
        let ctx = weekdays().context(datetime(2025, 1, 25, 11, 0, 0, 0));
        assert_eq!(ctx.today, date(2025, 1, 25));
        assert_eq!(ctx.weekday, "saturday");
        assert!(!ctx.is_workday);
        assert_eq!(ctx.next_slot.date, date(2025, 1, 27));
        assert_eq!(ctx.day_start, "09:00");
    }
}
