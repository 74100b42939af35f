//! Enumerations for task category, status and outcome.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of work a task represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Cognitively demanding, focus-intensive work
    Deep,

    /// Administrative or low-focus work
    Shallow,
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deep" => Ok(Category::Deep),
            "shallow" => Ok(Category::Shallow),
            _ => Err(format!("Invalid category: {s}")),
        }
    }
}

impl Category {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Deep => "deep",
            Category::Shallow => "shallow",
        }
    }
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task occupies its slot
    #[default]
    Scheduled,

    /// Task was moved; a linked replacement carries on
    Postponed,

    /// Task was dropped
    Cancelled,
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(TaskStatus::Scheduled),
            "postponed" => Ok(TaskStatus::Postponed),
            "cancelled" | "canceled" => Ok(TaskStatus::Cancelled),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

impl TaskStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Scheduled => "scheduled",
            TaskStatus::Postponed => "postponed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Status with a leading icon for list display.
    ///
    /// ```rust
    /// use timeblock_core::models::TaskStatus;
    ///
    /// assert_eq!(TaskStatus::Scheduled.with_icon(), "○ Scheduled");
    /// assert_eq!(TaskStatus::Cancelled.with_icon(), "✗ Cancelled");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            TaskStatus::Scheduled => "○ Scheduled",
            TaskStatus::Postponed => "➤ Postponed",
            TaskStatus::Cancelled => "✗ Cancelled",
        }
    }
}

/// How the actual effort compared to the scheduled duration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    OnTime,
    Over,
    Under,
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "on_time" | "ontime" => Ok(Outcome::OnTime),
            "over" => Ok(Outcome::Over),
            "under" => Ok(Outcome::Under),
            _ => Err(format!("Invalid outcome: {s}")),
        }
    }
}

impl Outcome {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::OnTime => "on_time",
            Outcome::Over => "over",
            Outcome::Under => "under",
        }
    }
}
