//! Monday-anchored week of seven days.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Day, DayStats, PeakHours, Task};
use crate::{
    error::Result,
    time::{add_days, weekday_index},
};

/// Seven consecutive days starting on a Monday.
#[derive(Debug, Clone, PartialEq)]
pub struct Week {
    days: [Day; 7],
}

/// Week totals plus the per-day breakdown they were summed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekStats {
    pub totals: DayStats,
    pub per_day: [DayStats; 7],
}

impl WeekStats {
    /// Index (0 = Monday) of the day with the most deep work.
    ///
    /// Ties go to the earliest day. A week without deep work has no winner.
    pub fn best_day(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (index, stats) in self.per_day.iter().enumerate() {
            if stats.deep_minutes == 0 {
                continue;
            }
            match best {
                Some((_, minutes)) if minutes >= stats.deep_minutes => {}
                _ => best = Some((index, stats.deep_minutes)),
            }
        }
        best.map(|(index, _)| index)
    }
}

/// Monday on or before `date`. Sunday belongs to the preceding Monday.
pub fn monday_of(date: Date) -> Date {
    let offset = date.weekday().to_monday_zero_offset();
    add_days(date, -i64::from(offset))
}

impl Week {
    /// Seven empty days for the week containing `date`.
    pub fn build(date: Date) -> Self {
        let monday = monday_of(date);
        Self {
            days: std::array::from_fn(|i| Day::new(add_days(monday, i as i64))),
        }
    }

    /// Builds the week and files each task under its date.
    ///
    /// Tasks outside the seven days are skipped. Overlapping scheduled tasks
    /// surface as the error from [`Day::insert`].
    pub fn build_from_tasks<I>(date: Date, tasks: I) -> Result<Self>
    where
        I: IntoIterator<Item = Task>,
    {
        let mut week = Self::build(date);
        for task in tasks {
            if let Some(day) = week.day_for_mut(task.scheduled_date) {
                day.insert(task)?;
            }
        }
        Ok(week)
    }

    pub fn monday(&self) -> Date {
        self.days[0].date()
    }

    pub fn sunday(&self) -> Date {
        self.days[6].date()
    }

    pub fn next_monday(&self) -> Date {
        add_days(self.monday(), 7)
    }

    pub fn previous_monday(&self) -> Date {
        add_days(self.monday(), -7)
    }

    pub fn days(&self) -> &[Day; 7] {
        &self.days
    }

    /// Day by index, 0 = Monday.
    pub fn day(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }

    pub fn contains(&self, date: Date) -> bool {
        self.monday() <= date && date <= self.sunday()
    }

    pub fn day_for(&self, date: Date) -> Option<&Day> {
        self.index_of(date).map(|i| &self.days[i])
    }

    fn day_for_mut(&mut self, date: Date) -> Option<&mut Day> {
        self.index_of(date).map(|i| &mut self.days[i])
    }

    fn index_of(&self, date: Date) -> Option<usize> {
        self.contains(date).then(|| weekday_index(date.weekday()))
    }

    /// All tasks of the week, Monday first, each day in start order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.days.iter().flat_map(|d| d.tasks().iter())
    }

    /// Sums every day's statistics; nothing is cached.
    pub fn stats(&self, peak: Option<&PeakHours>) -> WeekStats {
        let mut stats = WeekStats::default();
        for (index, day) in self.days.iter().enumerate() {
            let day_stats = day.compute_stats(peak);
            stats.totals.accumulate(&day_stats);
            stats.per_day[index] = day_stats;
        }
        stats
    }
}
