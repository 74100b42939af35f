//! One calendar date worth of tasks, kept sorted and overlap free.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Category, Task, TaskStatus};
use crate::{
    error::{Result, ScheduleError},
    time::{overlaps, to_minutes},
};

/// Tasks of a single date ordered by start time.
///
/// Only `scheduled` tasks take part in overlap checks; cancelled and
/// postponed entries stay in the list for history and statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Day {
    date: Date,
    tasks: Vec<Task>,
}

/// Per-day totals produced by [`Day::compute_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    /// Minutes of scheduled deep work
    pub deep_minutes: u32,
    /// Minutes of scheduled shallow work
    pub shallow_minutes: u32,
    /// Number of cancelled tasks
    pub cancelled: u32,
    /// Number of postponed tasks
    pub postponed: u32,
    /// Minutes of scheduled deep work inside the peak window, when one was given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_deep_minutes: Option<u32>,
}

impl DayStats {
    pub fn total_minutes(&self) -> u32 {
        self.deep_minutes + self.shallow_minutes
    }

    /// Adds another day's numbers into this one.
    pub fn accumulate(&mut self, other: &DayStats) {
        self.deep_minutes += other.deep_minutes;
        self.shallow_minutes += other.shallow_minutes;
        self.cancelled += other.cancelled;
        self.postponed += other.postponed;
        self.peak_deep_minutes = match (self.peak_deep_minutes, other.peak_deep_minutes) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(0) + b.unwrap_or(0)),
        };
    }
}

/// Inclusive-exclusive `HH:MM` bounds of the configured peak hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakHours {
    pub start: String,
    pub end: String,
}

impl Day {
    /// Creates an empty day.
    pub fn new(date: Date) -> Self {
        Self {
            date,
            tasks: Vec::new(),
        }
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Scheduled tasks in start order.
    pub fn scheduled(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_scheduled())
    }

    /// Adds a task, keeping the list sorted by start time.
    ///
    /// Passing `None` does nothing. A scheduled task that overlaps another
    /// scheduled task is rejected and the day is left untouched.
    pub fn insert(&mut self, task: impl Into<Option<Task>>) -> Result<()> {
        let Some(task) = task.into() else {
            return Ok(());
        };

        if task.scheduled_date != self.date {
            return Err(ScheduleError::invalid_input("scheduled_date").with_reason(format!(
                "task '{}' is dated {} but this day is {}",
                task.description, task.scheduled_date, self.date
            )));
        }

        if task.is_scheduled() {
            if let Some(existing) = self.scheduled().find(|t| t.overlaps(&task)) {
                return Err(task.overlap_error(existing));
            }
        }

        self.tasks.push(task);
        // stable: equal starts keep insertion order
        self.tasks.sort_by_key(Task::start_minutes);
        Ok(())
    }

    /// First scheduled task, in start order, overlapping `[start, end)`.
    pub fn find_overlap(&self, start: &str, end: &str) -> Option<&Task> {
        let (start, end) = (to_minutes(start), to_minutes(end));
        self.scheduled()
            .find(|t| overlaps(start, end, t.start_minutes(), t.end_minutes()))
    }

    /// Removes and returns the task with `id`.
    pub fn remove_by_id(&mut self, id: u64) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Folds all tasks into minute and status counters.
    pub fn compute_stats(&self, peak: Option<&PeakHours>) -> DayStats {
        let peak_bounds = peak.map(|p| (to_minutes(&p.start), to_minutes(&p.end)));
        let mut stats = DayStats {
            peak_deep_minutes: peak_bounds.map(|_| 0),
            ..DayStats::default()
        };

        for task in &self.tasks {
            match task.status {
                TaskStatus::Cancelled => stats.cancelled += 1,
                TaskStatus::Postponed => stats.postponed += 1,
                TaskStatus::Scheduled => {
                    let minutes = task.duration_minutes();
                    match task.category {
                        Category::Deep => {
                            stats.deep_minutes += minutes;
                            if let (Some((peak_start, peak_end)), Some(total)) =
                                (peak_bounds, stats.peak_deep_minutes.as_mut())
                            {
                                let from = task.start_minutes().max(peak_start);
                                let to = task.end_minutes().min(peak_end);
                                *total += to.saturating_sub(from);
                            }
                        }
                        Category::Shallow => stats.shallow_minutes += minutes,
                    }
                }
            }
        }

        stats
    }
}
