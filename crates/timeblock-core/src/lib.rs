//! Core library for the timeblock scheduling application.
//!
//! This crate provides the business logic for scheduling deep and shallow
//! work blocks on 15-minute boundaries: task construction and lifecycle,
//! overlap-free storage, week views, workday rules, and an LLM-assisted
//! planner that validates every proposal before it can be saved.
//!
//! # Layers
//!
//! - **Models** ([`models`]): [`Task`], [`Day`](models::Day),
//!   [`Week`](models::Week) and the three-week [`WeekWindow`](models::WeekWindow)
//! - **Rules** ([`scheduler`], [`validator`]): workday configuration, next
//!   available slot, and checks for proposed schedules
//! - **Storage** ([`repository`], [`db`]): the async [`Repository`] seam and
//!   its SQLite implementation
//! - **Planning** ([`planner`], [`llm`]): a retrying, conversational session
//!   on top of any [`LlmClient`](llm::LlmClient)
//! - **Display** ([`display`]): markdown via [`std::fmt::Display`], rendered
//!   by the CLI
//!
//! # Quick Start
//!
//! ```rust
//! use jiff::civil::{date, datetime};
//! use timeblock_core::{validator::ProposedTask, Scheduler, Validator};
//!
//! let now = datetime(2025, 1, 20, 10, 23, 0, 0);
//! let slot = Scheduler::default().next_available_start(now);
//! assert_eq!(slot.date, date(2025, 1, 20));
//! assert_eq!(slot.start, "10:30");
//!
//! let proposal = ProposedTask {
//!     date: "2025-01-20".to_string(),
//!     description: "Write report".to_string(),
//!     category: "deep".to_string(),
//!     start: "10:30".to_string(),
//!     end: "12:00".to_string(),
//! };
//! assert!(Validator::new(now).validate(&[proposal], &[]).valid);
//! ```

pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod llm;
pub mod models;
pub mod params;
pub mod planner;
pub mod repository;
pub mod scheduler;
pub mod time;
pub mod validator;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use db::Database;
pub use display::{CreateResult, PostponeResult, UpdateResult};
pub use error::{Result, ScheduleError};
pub use models::{Category, Day, Outcome, Task, TaskStatus, Week, WeekWindow};
pub use params::{CreateTask, PostponeTask, TaskTimeUpdate};
pub use planner::{Clock, FixedClock, PlanResult, Planner, PlannerBuilder, SystemClock};
pub use repository::{Repository, SqliteRepository};
pub use scheduler::{NextSlot, Scheduler};
pub use validator::{ValidationError, ValidationResult, Validator};
