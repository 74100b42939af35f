//! Parameter structures shared by the CLI and the core.
//!
//! These carry raw, unvalidated user input. Validation happens when they are
//! turned into domain values (see [`Task::new`](crate::models::Task::new)),
//! so every interface gets the same error kinds in the same order.

use serde::{Deserialize, Serialize};

/// Fields for creating a task directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTask {
    /// What the block is for
    pub description: String,
    /// `deep` or `shallow`
    pub category: String,
    /// `YYYY-MM-DD`; today when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    /// `HH:MM`
    pub scheduled_start: String,
    /// `HH:MM`
    pub scheduled_end: String,
}

/// Parameters for moving a task to a new date and time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostponeTask {
    pub id: u64,
    pub scheduled_date: String,
    pub scheduled_start: String,
    pub scheduled_end: String,
}

/// New start/end for one task in a batch time update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTimeUpdate {
    pub id: u64,
    pub scheduled_start: String,
    pub scheduled_end: String,
}
