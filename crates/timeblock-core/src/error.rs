//! Error types for the scheduling engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::LlmError;

/// Every failure the engine can report.
///
/// Variants fall into three groups: task construction errors (first failing
/// check wins), domain conflicts (overlap, missing task, illegal status
/// change) and infrastructure failures. Planning validation problems are not
/// errors; they travel as data inside
/// [`PlanResult`](crate::planner::PlanResult).
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Task description is empty or whitespace only
    #[error("Task description must not be empty")]
    EmptyDescription,

    /// Category is neither `deep` nor `shallow`
    #[error("Invalid category '{value}': expected 'deep' or 'shallow'")]
    InvalidCategory { value: String },

    /// Date is not a valid `YYYY-MM-DD` calendar date
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// Start time is not a strict `HH:MM` string
    #[error("Invalid start time '{value}': expected HH:MM")]
    InvalidStartTime { value: String },

    /// End time is not a strict `HH:MM` string
    #[error("Invalid end time '{value}': expected HH:MM")]
    InvalidEndTime { value: String },

    /// End time is equal to or earlier than the start time
    #[error("End time {end} must be after start time {start}")]
    EndNotAfterStart { start: String, end: String },

    /// Two scheduled tasks on the same date share part of their interval
    #[error(
        "'{description}' ({start}-{end}) overlaps '{existing_description}' \
         ({existing_start}-{existing_end})"
    )]
    Overlap {
        description: String,
        start: String,
        end: String,
        existing_description: String,
        existing_start: String,
        existing_end: String,
    },

    /// Task not found for the given ID
    #[error("Task with ID {id} not found")]
    TaskNotFound { id: u64 },

    /// Status change not allowed from the task's current status
    #[error("Cannot {action} task {id}: task is {status}")]
    InvalidTransition {
        id: u64,
        status: String,
        action: &'static str,
    },

    /// Outcome recorded before the task's time window has passed
    #[error("Cannot set outcome for task {id} before it has ended")]
    OutcomeBeforeEnd { id: u64 },

    /// A plan still carrying validation errors was handed to `save`
    #[error("Plan has {count} unresolved validation error(s); refine it before saving")]
    UnresolvedValidation { count: usize },

    /// LLM transport or response parsing failed during planning
    #[error("LLM request failed on attempt {attempt}: {source}")]
    Llm {
        attempt: usize,
        #[source]
        source: LlmError,
    },

    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },

    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// XDG base directory errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),

    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> ScheduleError {
        ScheduleError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> ScheduleError {
        ScheduleError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl ScheduleError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Returns true for errors caused by conflicting scheduled tasks.
    pub fn is_overlap(&self) -> bool {
        matches!(self, ScheduleError::Overlap { .. })
    }

    /// Returns true for errors raised while validating task fields.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            ScheduleError::EmptyDescription
                | ScheduleError::InvalidCategory { .. }
                | ScheduleError::InvalidDate { .. }
                | ScheduleError::InvalidStartTime { .. }
                | ScheduleError::InvalidEndTime { .. }
                | ScheduleError::EndNotAfterStart { .. }
        )
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ScheduleError::database(message).with_source(e))
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, ScheduleError>;
