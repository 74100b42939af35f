//! Display implementations for domain models.
//!
//! Everything renders markdown for the terminal renderer. Tasks have two
//! forms: the full block from `Display for Task`, and the one-line
//! [`TaskLine`] used inside days and weeks.

use std::fmt;

use super::datetime::{DayHeading, LocalDateTime, Minutes};
use crate::{
    models::{Category, Day, DayStats, Outcome, Task, TaskStatus, Week, WeekStats, WeekWindow},
    scheduler::NextSlot,
    time::{weekday_name, WEEKDAYS},
};

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}. {} ({})", self.id, self.description, self.status.with_icon())?;
        writeln!(f)?;
        writeln!(f, "- Date: {}", DayHeading(self.scheduled_date))?;
        writeln!(
            f,
            "- Time: {}-{} ({})",
            self.scheduled_start,
            self.scheduled_end,
            Minutes(self.duration_minutes())
        )?;
        writeln!(f, "- Category: {}", self.category)?;
        if let Some(outcome) = self.outcome {
            writeln!(f, "- Outcome: {outcome}")?;
        }
        if let Some(from) = self.postponed_from {
            writeln!(f, "- Postponed from: task {from}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        Ok(())
    }
}

/// Compact single-line rendering of a task.
pub struct TaskLine<'a>(pub &'a Task);

impl fmt::Display for TaskLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let task = self.0;
        write!(f, "- `{}-{}` ", task.scheduled_start, task.scheduled_end)?;
        if task.is_scheduled() {
            write!(f, "**{}**", task.description)?;
        } else {
            write!(f, "~~{}~~ ({})", task.description, task.status)?;
        }
        write!(f, " [{}] #{}", task.category, task.id)?;
        if let Some(outcome) = task.outcome {
            write!(f, " - {outcome}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for DayStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deep: {} | Shallow: {} | Total: {}",
            Minutes(self.deep_minutes),
            Minutes(self.shallow_minutes),
            Minutes(self.total_minutes())
        )?;
        if let Some(peak) = self.peak_deep_minutes {
            write!(f, " | Deep in peak hours: {}", Minutes(peak))?;
        }
        if self.cancelled > 0 || self.postponed > 0 {
            write!(
                f,
                " | Cancelled: {} | Postponed: {}",
                self.cancelled, self.postponed
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", DayHeading(self.date()))?;
        writeln!(f)?;
        if self.is_empty() {
            writeln!(f, "No tasks scheduled.")?;
            return Ok(());
        }
        for task in self.tasks() {
            write!(f, "{}", TaskLine(task))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.compute_stats(None))?;
        Ok(())
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Week of {} to {}", self.monday(), self.sunday())?;
        for day in self.days() {
            writeln!(f)?;
            write!(f, "{day}")?;
        }
        Ok(())
    }
}

impl fmt::Display for WeekStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let with_peak = self.totals.peak_deep_minutes.is_some();

        writeln!(f, "## Week summary")?;
        writeln!(f)?;
        if with_peak {
            writeln!(f, "| Day | Deep | Shallow | Deep in peak |")?;
            writeln!(f, "|:-|-:|-:|-:|")?;
        } else {
            writeln!(f, "| Day | Deep | Shallow |")?;
            writeln!(f, "|:-|-:|-:|")?;
        }
        for (weekday, stats) in WEEKDAYS.into_iter().zip(self.per_day.iter()) {
            write!(
                f,
                "| {} | {} | {} |",
                weekday_name(weekday),
                Minutes(stats.deep_minutes),
                Minutes(stats.shallow_minutes)
            )?;
            if with_peak {
                write!(f, " {} |", Minutes(stats.peak_deep_minutes.unwrap_or(0)))?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.totals)?;
        if let Some(best) = self.best_day() {
            writeln!(f)?;
            writeln!(f, "Most deep work: **{}**", weekday_name(WEEKDAYS[best]))?;
        }
        Ok(())
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outline = |f: &mut fmt::Formatter<'_>, label: &str, week: &Week| {
            let stats = week.stats(None);
            writeln!(
                f,
                "{label}: week of {} ({} task(s), {} deep, {} shallow)",
                week.monday(),
                week.tasks().filter(|t| t.is_scheduled()).count(),
                Minutes(stats.totals.deep_minutes),
                Minutes(stats.totals.shallow_minutes)
            )
        };

        outline(f, "Previous", self.previous())?;
        outline(f, "Next", self.next())?;
        writeln!(f)?;
        write!(f, "{}", self.current())
    }
}

impl fmt::Display for NextSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Next available slot: **{}** at **{}** (working day ends {})",
            DayHeading(self.date),
            self.start,
            self.end
        )
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::{models::PeakHours, params::CreateTask};

    fn task(id: u64, day: &str, category: &str, start: &str, end: &str) -> Task {
        let mut task = Task::new(
            &CreateTask {
                description: format!("Task {id}"),
                category: category.to_string(),
                scheduled_date: Some(day.to_string()),
                scheduled_start: start.to_string(),
                scheduled_end: end.to_string(),
            },
            date(2025, 1, 1),
        )
        .unwrap();
        task.id = id;
        task
    }

    #[test]
    fn test_task_block() {
        let output = task(3, "2025-01-20", "deep", "09:00", "10:30").to_string();
        assert!(output.starts_with("### 3. Task 3 (○ Scheduled)"));
        assert!(output.contains("- Date: Monday 2025-01-20"));
        assert!(output.contains("- Time: 09:00-10:30 (1h 30m)"));
        assert!(!output.contains("Outcome"));
    }

    #[test]
    fn test_task_line_strikes_inactive() {
        let mut t = task(4, "2025-01-20", "shallow", "11:00", "11:30");
        assert_eq!(
            TaskLine(&t).to_string(),
            "- `11:00-11:30` **Task 4** [shallow] #4\n"
        );
        t.cancel().unwrap();
        assert!(TaskLine(&t).to_string().contains("~~Task 4~~ (cancelled)"));
    }

    #[test]
    fn test_day_lists_tasks_and_totals() {
        let mut day = Day::new(date(2025, 1, 20));
        assert!(day.to_string().contains("No tasks scheduled."));

        day.insert(task(1, "2025-01-20", "deep", "09:00", "11:00")).unwrap();
        day.insert(task(2, "2025-01-20", "shallow", "11:00", "11:30")).unwrap();
        let output = day.to_string();
        assert!(output.starts_with("## Monday 2025-01-20"));
        assert!(output.contains("Deep: 2h | Shallow: 30m | Total: 2h 30m"));
    }

    #[test]
    fn test_week_stats_table() {
        let week = Week::build_from_tasks(
            date(2025, 1, 20),
            vec![task(1, "2025-01-22", "deep", "09:00", "12:00")],
        )
        .unwrap();
        let peak = PeakHours {
            start: "09:00".to_string(),
            end: "10:00".to_string(),
        };
        let output = week.stats(Some(&peak)).to_string();
        assert!(output.contains("| wednesday | 3h | 0m | 1h |"));
        assert!(output.contains("Most deep work: **wednesday**"));
    }

    #[test]
    fn test_window_outline() {
        let window = WeekWindow::new(
            Week::build(date(2025, 1, 13)),
            Week::build(date(2025, 1, 20)),
            Week::build(date(2025, 1, 27)),
        );
        let output = window.to_string();
        assert!(output.contains("Previous: week of 2025-01-13"));
        assert!(output.contains("Next: week of 2025-01-27"));
        assert!(output.contains("# Week of 2025-01-20 to 2025-01-26"));
    }
}
