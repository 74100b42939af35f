//! Task model definition and its validated transitions.

use jiff::{
    civil::{Date, DateTime},
    Timestamp,
};
use serde::{Deserialize, Serialize};

use super::{Category, Outcome, TaskStatus};
use crate::{
    error::{Result, ScheduleError},
    params::CreateTask,
    time::{is_valid_hhmm, minute_of_day, overlaps, parse_date, to_minutes},
};

/// A single time block on one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier, `0` until the task is persisted
    pub id: u64,

    /// What the block is for
    pub description: String,

    /// Deep or shallow work
    pub category: Category,

    /// Calendar date the block sits on
    pub scheduled_date: Date,

    /// Start time of day, strict `HH:MM`
    pub scheduled_start: String,

    /// End time of day, strict `HH:MM`, after the start
    pub scheduled_end: String,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// Effort classification, set once the block is over
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,

    /// ID of the task this one replaced when it was postponed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postponed_from: Option<u64>,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,
}

/// Validated `[start, end)` pair of `HH:MM` strings.
struct Slot {
    start: String,
    end: String,
}

fn validate_description(description: &str) -> Result<String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

fn validate_category(category: &str) -> Result<Category> {
    category
        .parse::<Category>()
        .map_err(|_| ScheduleError::InvalidCategory {
            value: category.to_string(),
        })
}

fn validate_date(value: &str) -> Result<Date> {
    parse_date(value).ok_or_else(|| ScheduleError::InvalidDate {
        value: value.to_string(),
    })
}

fn validate_slot(start: &str, end: &str) -> Result<Slot> {
    if !is_valid_hhmm(start) {
        return Err(ScheduleError::InvalidStartTime {
            value: start.to_string(),
        });
    }
    if !is_valid_hhmm(end) {
        return Err(ScheduleError::InvalidEndTime {
            value: end.to_string(),
        });
    }
    if to_minutes(end) <= to_minutes(start) {
        return Err(ScheduleError::EndNotAfterStart {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(Slot {
        start: start.to_string(),
        end: end.to_string(),
    })
}

impl Task {
    /// Builds a task from raw fields.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// description, category, date (defaulting to `today`), start format,
    /// end format, end after start.
    ///
    /// ```rust
    /// use jiff::civil::date;
    /// use timeblock_core::{models::TaskStatus, params::CreateTask, Task};
    ///
    /// let task = Task::new(
    ///     &CreateTask {
    ///         description: "Draft chapter".to_string(),
    ///         category: "deep".to_string(),
    ///         scheduled_date: Some("2025-01-20".to_string()),
    ///         scheduled_start: "09:00".to_string(),
    ///         scheduled_end: "10:30".to_string(),
    ///     },
    ///     date(2025, 1, 18),
    /// )
    /// .unwrap();
    /// assert_eq!(task.status, TaskStatus::Scheduled);
    /// assert_eq!(task.duration_minutes(), 90);
    /// ```
    pub fn new(params: &CreateTask, today: Date) -> Result<Self> {
        let description = validate_description(&params.description)?;
        let category = validate_category(&params.category)?;
        let scheduled_date = match params.scheduled_date.as_deref() {
            Some(value) => validate_date(value)?,
            None => today,
        };
        let slot = validate_slot(&params.scheduled_start, &params.scheduled_end)?;

        Ok(Self {
            id: 0,
            description,
            category,
            scheduled_date,
            scheduled_start: slot.start,
            scheduled_end: slot.end,
            status: TaskStatus::Scheduled,
            outcome: None,
            postponed_from: None,
            created_at: Timestamp::now(),
        })
    }

    /// Re-checks the field invariants of an already built task.
    pub fn validate(&self) -> Result<()> {
        validate_description(&self.description)?;
        validate_slot(&self.scheduled_start, &self.scheduled_end)?;
        Ok(())
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == TaskStatus::Scheduled
    }

    pub fn is_deep(&self) -> bool {
        self.category == Category::Deep
    }

    pub fn start_minutes(&self) -> u32 {
        to_minutes(&self.scheduled_start)
    }

    pub fn end_minutes(&self) -> u32 {
        to_minutes(&self.scheduled_end)
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_minutes().saturating_sub(self.start_minutes())
    }

    /// True when both tasks are scheduled on the same date and their
    /// intervals share at least one minute.
    pub fn overlaps(&self, other: &Task) -> bool {
        self.is_scheduled()
            && other.is_scheduled()
            && self.scheduled_date == other.scheduled_date
            && overlaps(
                self.start_minutes(),
                self.end_minutes(),
                other.start_minutes(),
                other.end_minutes(),
            )
    }

    /// True once `now` is at or past the end of the block.
    pub fn has_ended(&self, now: DateTime) -> bool {
        let today = now.date();
        self.scheduled_date < today
            || (self.scheduled_date == today && self.end_minutes() <= minute_of_day(now))
    }

    /// Overlap error describing `self` against an existing task.
    pub(crate) fn overlap_error(&self, existing: &Task) -> ScheduleError {
        ScheduleError::Overlap {
            description: self.description.clone(),
            start: self.scheduled_start.clone(),
            end: self.scheduled_end.clone(),
            existing_description: existing.description.clone(),
            existing_start: existing.scheduled_start.clone(),
            existing_end: existing.scheduled_end.clone(),
        }
    }

    fn ensure_scheduled(&self, action: &'static str) -> Result<()> {
        if self.is_scheduled() {
            Ok(())
        } else {
            Err(ScheduleError::InvalidTransition {
                id: self.id,
                status: self.status.as_str().to_string(),
                action,
            })
        }
    }

    /// Marks a scheduled task as cancelled.
    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_scheduled("cancel")?;
        self.status = TaskStatus::Cancelled;
        Ok(())
    }

    /// Closes this task and returns its replacement on the new slot.
    ///
    /// Nothing but the status of `self` changes. The replacement is a fresh,
    /// unsaved task pointing back at `self` through `postponed_from`.
    pub fn postpone(&mut self, date: &str, start: &str, end: &str) -> Result<Task> {
        self.ensure_scheduled("postpone")?;
        let scheduled_date = validate_date(date)?;
        let slot = validate_slot(start, end)?;

        self.status = TaskStatus::Postponed;
        Ok(Task {
            id: 0,
            description: self.description.clone(),
            category: self.category,
            scheduled_date,
            scheduled_start: slot.start,
            scheduled_end: slot.end,
            status: TaskStatus::Scheduled,
            outcome: None,
            postponed_from: Some(self.id),
            created_at: Timestamp::now(),
        })
    }

    /// Records how the block went. Only allowed once it is over.
    pub fn set_outcome(&mut self, outcome: Outcome, now: DateTime) -> Result<()> {
        self.ensure_scheduled("set outcome for")?;
        if !self.has_ended(now) {
            return Err(ScheduleError::OutcomeBeforeEnd { id: self.id });
        }
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Replaces both times of the block.
    pub fn reschedule(&mut self, start: &str, end: &str) -> Result<()> {
        let slot = validate_slot(start, end)?;
        self.scheduled_start = slot.start;
        self.scheduled_end = slot.end;
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.description = validate_description(description)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, datetime};

    use super::*;

    fn params(start: &str, end: &str) -> CreateTask {
        CreateTask {
            description: "Write design doc".to_string(),
            category: "deep".to_string(),
            scheduled_date: Some("2025-01-20".to_string()),
            scheduled_start: start.to_string(),
            scheduled_end: end.to_string(),
        }
    }

    fn today() -> Date {
        date(2025, 1, 19)
    }

    #[test]
    fn test_new_round_trips_fields() {
        let task = Task::new(&params("09:00", "10:30"), today()).unwrap();
        assert_eq!(task.id, 0);
        assert_eq!(task.description, "Write design doc");
        assert_eq!(task.category, Category::Deep);
        assert_eq!(task.scheduled_date, date(2025, 1, 20));
        assert_eq!(task.scheduled_start, "09:00");
        assert_eq!(task.scheduled_end, "10:30");
        assert_eq!(task.status, TaskStatus::Scheduled);
        assert_eq!(task.outcome, None);
        assert_eq!(task.postponed_from, None);
    }

    #[test]
    fn test_new_defaults_date_to_today() {
        let mut p = params("09:00", "10:00");
        p.scheduled_date = None;
        let task = Task::new(&p, today()).unwrap();
        assert_eq!(task.scheduled_date, today());
    }

    #[test]
    fn test_new_validation_order() {
        let mut p = params("9am", "8am");
        p.description = "  ".to_string();
        p.category = "medium".to_string();
        assert!(matches!(
            Task::new(&p, today()),
            Err(ScheduleError::EmptyDescription)
        ));

        p.description = "Email".to_string();
        assert!(matches!(
            Task::new(&p, today()),
            Err(ScheduleError::InvalidCategory { .. })
        ));

        p.category = "Shallow".to_string();
        p.scheduled_date = Some("20-01-2025".to_string());
        assert!(matches!(
            Task::new(&p, today()),
            Err(ScheduleError::InvalidDate { .. })
        ));

        p.scheduled_date = Some("2025-01-20".to_string());
        assert!(matches!(
            Task::new(&p, today()),
            Err(ScheduleError::InvalidStartTime { .. })
        ));

        p.scheduled_start = "09:00".to_string();
        assert!(matches!(
            Task::new(&p, today()),
            Err(ScheduleError::InvalidEndTime { .. })
        ));

        p.scheduled_end = "09:00".to_string();
        assert!(matches!(
            Task::new(&p, today()),
            Err(ScheduleError::EndNotAfterStart { .. })
        ));
    }

    #[test]
    fn test_overlaps_ignores_inactive_tasks() {
        let a = Task::new(&params("09:00", "10:00"), today()).unwrap();
        let mut b = Task::new(&params("09:30", "10:30"), today()).unwrap();
        assert!(a.overlaps(&b));
        b.cancel().unwrap();
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_postpone_links_replacement() {
        let mut original = Task::new(&params("09:00", "10:00"), today()).unwrap();
        original.id = 7;
        let replacement = original.postpone("2025-01-21", "13:00", "14:00").unwrap();

        assert_eq!(original.status, TaskStatus::Postponed);
        assert_eq!(original.scheduled_start, "09:00");
        assert_eq!(replacement.postponed_from, Some(7));
        assert_eq!(replacement.status, TaskStatus::Scheduled);
        assert_eq!(replacement.scheduled_date, date(2025, 1, 21));
        assert_eq!(replacement.description, original.description);
    }

    #[test]
    fn test_postpone_rejects_bad_slot_without_mutating() {
        let mut original = Task::new(&params("09:00", "10:00"), today()).unwrap();
        let err = original.postpone("2025-01-21", "14:00", "13:00").unwrap_err();
        assert!(matches!(err, ScheduleError::EndNotAfterStart { .. }));
        assert_eq!(original.status, TaskStatus::Scheduled);
    }

    #[test]
    fn test_cancel_twice_is_invalid() {
        let mut task = Task::new(&params("09:00", "10:00"), today()).unwrap();
        task.cancel().unwrap();
        assert!(matches!(
            task.cancel(),
            Err(ScheduleError::InvalidTransition { action: "cancel", .. })
        ));
    }

    #[test]
    fn test_outcome_requires_ended_window() {
        let mut task = Task::new(&params("09:00", "10:00"), today()).unwrap();
        let during = datetime(2025, 1, 20, 9, 30, 0, 0);
        assert!(matches!(
            task.set_outcome(Outcome::Over, during),
            Err(ScheduleError::OutcomeBeforeEnd { .. })
        ));

        let after = datetime(2025, 1, 20, 10, 0, 0, 0);
        task.set_outcome(Outcome::Over, after).unwrap();
        assert_eq!(task.outcome, Some(Outcome::Over));
    }

    #[test]
    fn test_validate_catches_edited_fields() {
        let mut task = Task::new(&params("09:00", "10:00"), today()).unwrap();
        assert!(task.validate().is_ok());
        task.scheduled_end = "08:00".to_string();
        assert!(matches!(
            task.validate(),
            Err(ScheduleError::EndNotAfterStart { .. })
        ));
    }

    #[test]
    fn test_reschedule_and_describe() {
        let mut task = Task::new(&params("09:00", "10:00"), today()).unwrap();
        task.reschedule("11:00", "12:15").unwrap();
        assert_eq!(task.duration_minutes(), 75);
        assert!(task.reschedule("12:00", "11:00").is_err());
        assert_eq!(task.scheduled_start, "11:00");

        task.set_description(" Review PR ").unwrap();
        assert_eq!(task.description, "Review PR");
        assert!(matches!(
            task.set_description(""),
            Err(ScheduleError::EmptyDescription)
        ));
    }
}
