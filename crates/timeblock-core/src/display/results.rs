//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::Task;

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use jiff::civil::date;
/// use timeblock_core::{display::CreateResult, params::CreateTask, Task};
///
/// let mut task = Task::new(
///     &CreateTask {
///         description: "Review pull requests".to_string(),
///         category: "shallow".to_string(),
///         scheduled_date: Some("2025-01-20".to_string()),
///         scheduled_start: "14:00".to_string(),
///         scheduled_end: "15:00".to_string(),
///     },
///     date(2025, 1, 20),
/// )
/// .unwrap();
/// task.id = 12;
///
/// let output = CreateResult::new(task).to_string();
/// assert!(output.starts_with("Created task with ID: 12"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created task with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Vec<Task>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created {} task(s)", self.resource.len())?;
        for task in &self.resource {
            writeln!(f)?;
            write!(f, "{task}")?;
        }
        Ok(())
    }
}

/// Wrapper type for displaying the result of update operations, with the
/// list of changes made.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated task with ID: {}", self.resource.id)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// A postponed task together with its replacement.
pub struct PostponeResult {
    pub original: Task,
    pub replacement: Task,
}

impl fmt::Display for PostponeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Postponed task {} to {} {}-{} as task {}",
            self.original.id,
            self.replacement.scheduled_date,
            self.replacement.scheduled_start,
            self.replacement.scheduled_end,
            self.replacement.id
        )?;
        writeln!(f)?;
        write!(f, "{}", self.replacement)
    }
}
