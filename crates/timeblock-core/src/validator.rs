//! Checks LLM-proposed tasks before they are shown or saved.
//!
//! Validation never fails as an error: every problem is collected into a
//! [`ValidationResult`] so the whole list can be fed back to the model in a
//! single message.

use std::{collections::BTreeMap, fmt};

use jiff::civil::{Date, DateTime};
use serde::{Deserialize, Serialize};

use crate::{
    models::{Category, Task},
    time::{is_valid_hhmm, minute_of_day, overlaps, parse_date, to_minutes},
};

/// One task as proposed by the model, before any checks.
///
/// Missing fields deserialize as empty strings so they surface as
/// validation errors instead of parse failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedTask {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

/// Field a validation error is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationField {
    Description,
    Category,
    ScheduledDate,
    ScheduledStart,
    ScheduledEnd,
    Overlap,
}

impl ValidationField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationField::Description => "description",
            ValidationField::Category => "category",
            ValidationField::ScheduledDate => "scheduled_date",
            ValidationField::ScheduledStart => "scheduled_start",
            ValidationField::ScheduledEnd => "scheduled_end",
            ValidationField::Overlap => "overlap",
        }
    }
}

impl fmt::Display for ValidationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Position of the offending task in the proposed list
    pub task_index: usize,
    pub field: ValidationField,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "task {} [{}]: {}",
            self.task_index + 1,
            self.field,
            self.message
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// A proposal that passed the field checks.
struct Checked<'a> {
    index: usize,
    task: &'a ProposedTask,
    date: Date,
    start: u32,
    end: u32,
}

/// Three-pass validator bound to a reference time.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    now: DateTime,
}

impl Validator {
    pub fn new(now: DateTime) -> Self {
        Self { now }
    }

    /// Runs field checks, overlap within the proposal and overlap with
    /// `existing`, in that order, collecting every violation.
    ///
    /// Tasks with a bad field are left out of both overlap passes.
    pub fn validate(&self, proposed: &[ProposedTask], existing: &[Task]) -> ValidationResult {
        let mut errors = Vec::new();

        let checked: Vec<Checked<'_>> = proposed
            .iter()
            .enumerate()
            .filter_map(|(index, task)| self.check_fields(index, task, &mut errors))
            .collect();

        check_self_overlap(&checked, &mut errors);
        check_existing_overlap(&checked, existing, &mut errors);

        ValidationResult::from_errors(errors)
    }

    fn check_fields<'a>(
        &self,
        index: usize,
        task: &'a ProposedTask,
        errors: &mut Vec<ValidationError>,
    ) -> Option<Checked<'a>> {
        let before = errors.len();
        let mut push = |field, message: String| {
            errors.push(ValidationError {
                task_index: index,
                field,
                message,
            })
        };

        if task.description.trim().is_empty() {
            push(
                ValidationField::Description,
                "description must not be empty".to_string(),
            );
        }
        if task.category.parse::<Category>().is_err() {
            push(
                ValidationField::Category,
                format!(
                    "category '{}' must be 'deep' or 'shallow'",
                    task.category
                ),
            );
        }

        let date = parse_date(&task.date);
        if date.is_none() {
            push(
                ValidationField::ScheduledDate,
                format!("date '{}' is not a valid YYYY-MM-DD date", task.date),
            );
        }

        let start_ok = is_valid_hhmm(&task.start);
        let end_ok = is_valid_hhmm(&task.end);
        if !start_ok {
            push(
                ValidationField::ScheduledStart,
                format!("start time '{}' is not in HH:MM format", task.start),
            );
        }
        if !end_ok {
            push(
                ValidationField::ScheduledEnd,
                format!("end time '{}' is not in HH:MM format", task.end),
            );
        }

        let (start, end) = (to_minutes(&task.start), to_minutes(&task.end));
        if start_ok && end_ok && end <= start {
            push(
                ValidationField::ScheduledEnd,
                format!(
                    "end time {} must be after start time {}",
                    task.end, task.start
                ),
            );
        }

        if start_ok && date == Some(self.now.date()) && start < minute_of_day(self.now) {
            push(
                ValidationField::ScheduledStart,
                format!(
                    "start time {} is already in the past (it is now {:02}:{:02})",
                    task.start,
                    self.now.hour(),
                    self.now.minute()
                ),
            );
        }

        if errors.len() > before {
            return None;
        }
        date.map(|date| Checked {
            index,
            task,
            date,
            start,
            end,
        })
    }
}

fn check_self_overlap(checked: &[Checked<'_>], errors: &mut Vec<ValidationError>) {
    let mut by_date: BTreeMap<Date, Vec<&Checked<'_>>> = BTreeMap::new();
    for task in checked {
        by_date.entry(task.date).or_default().push(task);
    }

    for tasks in by_date.values_mut() {
        tasks.sort_by_key(|t| t.start);
        for (later_pos, later) in tasks.iter().enumerate() {
            for earlier in &tasks[..later_pos] {
                if overlaps(earlier.start, earlier.end, later.start, later.end) {
                    errors.push(ValidationError {
                        task_index: later.index,
                        field: ValidationField::Overlap,
                        message: format!(
                            "'{}' ({}-{}) overlaps proposed task '{}' ({}-{}) on {}",
                            later.task.description,
                            later.task.start,
                            later.task.end,
                            earlier.task.description,
                            earlier.task.start,
                            earlier.task.end,
                            later.date
                        ),
                    });
                }
            }
        }
    }
}

fn check_existing_overlap(
    checked: &[Checked<'_>],
    existing: &[Task],
    errors: &mut Vec<ValidationError>,
) {
    for task in checked {
        let clashes = existing.iter().filter(|e| {
            e.is_scheduled()
                && e.scheduled_date == task.date
                && overlaps(task.start, task.end, e.start_minutes(), e.end_minutes())
        });
        for clash in clashes {
            errors.push(ValidationError {
                task_index: task.index,
                field: ValidationField::Overlap,
                message: format!(
                    "'{}' ({}-{}) overlaps existing task '{}' ({}-{}) on {}",
                    task.task.description,
                    task.task.start,
                    task.task.end,
                    clash.description,
                    clash.scheduled_start,
                    clash.scheduled_end,
                    task.date
                ),
            });
        }
    }
}

/// Renders all errors as one message for the model.
pub fn format_feedback(result: &ValidationResult) -> String {
    let mut feedback = format!(
        "The proposed schedule has {} problem(s):\n",
        result.errors.len()
    );
    for error in &result.errors {
        feedback.push_str(&format!("- {error}\n"));
    }
    feedback.push_str(
        "\nFix every problem and reply with the complete corrected schedule \
         in the same JSON format.",
    );
    feedback
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, datetime};

    use super::*;
    use crate::params::CreateTask;

    fn validator() -> Validator {
        // Monday morning, before any test slot
        Validator::new(datetime(2025, 1, 20, 8, 0, 0, 0))
    }

    fn proposed(day: &str, description: &str, start: &str, end: &str) -> ProposedTask {
        ProposedTask {
            date: day.to_string(),
            description: description.to_string(),
            category: "deep".to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    fn existing(day: &str, description: &str, start: &str, end: &str) -> Task {
        Task::new(
            &CreateTask {
                description: description.to_string(),
                category: "shallow".to_string(),
                scheduled_date: Some(day.to_string()),
                scheduled_start: start.to_string(),
                scheduled_end: end.to_string(),
            },
            date(2025, 1, 20),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_proposal() {
        let result = validator().validate(
            &[
                proposed("2025-01-20", "Write", "09:00", "10:00"),
                proposed("2025-01-20", "Review", "10:00", "11:00"),
            ],
            &[],
        );
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_zero_length_task_reports_end() {
        let result = validator().validate(&[proposed("2025-01-21", "Write", "09:00", "09:00")], &[]);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        let error = &result.errors[0];
        assert_eq!(error.field, ValidationField::ScheduledEnd);
        assert_eq!(error.task_index, 0);
        assert_eq!(error.message.matches("09:00").count(), 2);
    }

    #[test]
    fn test_identical_tasks_flag_second_as_overlap() {
        let result = validator().validate(
            &[
                proposed("2025-01-21", "Write", "09:00", "10:00"),
                proposed("2025-01-21", "Write", "09:00", "10:00"),
            ],
            &[],
        );
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].task_index, 1);
        assert_eq!(result.errors[0].field, ValidationField::Overlap);
    }

    #[test]
    fn test_self_overlap_reports_later_start() {
        let result = validator().validate(
            &[
                proposed("2025-01-21", "Late", "10:30", "11:30"),
                proposed("2025-01-21", "Early", "10:00", "11:00"),
                proposed("2025-01-22", "Other day", "10:00", "11:00"),
            ],
            &[],
        );
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].task_index, 0);
        assert!(result.errors[0].message.contains("Early"));
    }

    #[test]
    fn test_field_errors_accumulate_and_skip_overlap() {
        let mut bad = proposed("2025-13-01", "", "9:00", "10:00");
        bad.category = "medium".to_string();
        let result = validator().validate(
            &[bad, proposed("2025-01-21", "Fine", "09:00", "10:00")],
            &[],
        );
        let fields: Vec<_> = result.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                ValidationField::Description,
                ValidationField::Category,
                ValidationField::ScheduledDate,
                ValidationField::ScheduledStart,
            ]
        );
        assert!(result.errors.iter().all(|e| e.task_index == 0));
    }

    #[test]
    fn test_past_start_today() {
        let v = Validator::new(datetime(2025, 1, 20, 10, 15, 0, 0));
        let result = v.validate(
            &[
                proposed("2025-01-20", "Too early", "10:00", "10:30"),
                proposed("2025-01-20", "Right on time", "10:15", "10:45"),
                proposed("2025-01-21", "Tomorrow", "08:00", "08:30"),
            ],
            &[],
        );
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].task_index, 0);
        assert_eq!(result.errors[0].field, ValidationField::ScheduledStart);
    }

    #[test]
    fn test_existing_overlap_ignores_inactive_tasks() {
        let mut cancelled = existing("2025-01-21", "Dropped", "13:00", "14:00");
        cancelled.cancel().unwrap();
        let saved = vec![existing("2025-01-21", "Standup", "09:00", "09:15"), cancelled];

        let result = validator().validate(
            &[
                proposed("2025-01-21", "Write", "09:00", "10:00"),
                proposed("2025-01-21", "Design", "13:00", "14:00"),
            ],
            &saved,
        );
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].task_index, 0);
        assert!(result.errors[0].message.contains("Standup"));
    }

    #[test]
    fn test_format_feedback_lists_every_error() {
        let result = validator().validate(
            &[
                proposed("2025-01-21", "A", "09:00", "09:00"),
                proposed("bad", "B", "09:00", "10:00"),
            ],
            &[],
        );
        let feedback = format_feedback(&result);
        assert!(feedback.contains("2 problem(s)"));
        assert!(feedback.contains("task 1 [scheduled_end]"));
        assert!(feedback.contains("task 2 [scheduled_date]"));
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let task: ProposedTask =
            serde_json::from_str(r#"{"description": "Write", "start": "09:00"}"#).unwrap();
        assert_eq!(task.category, "");
        let result = validator().validate(&[task], &[]);
        let fields: Vec<_> = result.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                ValidationField::Category,
                ValidationField::ScheduledDate,
                ValidationField::ScheduledEnd,
            ]
        );
    }
}
