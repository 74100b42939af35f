//! Display for planning results.

use std::fmt;

use super::datetime::Minutes;
use crate::{planner::PlanResult, time::parse_date};

impl fmt::Display for PlanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Proposed schedule")?;
        writeln!(f)?;
        if !self.summary.trim().is_empty() {
            writeln!(f, "{}", self.summary.trim())?;
            writeln!(f)?;
        }

        if self.proposals.is_empty() {
            writeln!(f, "No tasks proposed.")?;
        }

        for (date, tasks) in self.proposals_by_date() {
            match parse_date(date) {
                Some(parsed) => writeln!(f, "## {}", super::DayHeading(parsed))?,
                None => writeln!(f, "## {date}")?,
            }
            writeln!(f)?;
            for task in tasks {
                writeln!(
                    f,
                    "- `{}-{}` **{}** [{}]",
                    task.start, task.end, task.description, task.category
                )?;
            }
            writeln!(f)?;
        }

        writeln!(
            f,
            "Total: {} across {} task(s), {} attempt(s)",
            Minutes(self.total_minutes()),
            self.proposals.len(),
            self.attempts
        )?;

        if self.has_validation_errors() {
            writeln!(f)?;
            writeln!(f, "## Unresolved problems")?;
            writeln!(f)?;
            for error in &self.validation_errors {
                writeln!(f, "- {error}")?;
            }
        }
        Ok(())
    }
}
