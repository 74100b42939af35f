//! Domain models: tasks and the day/week views built over them.
//!
//! [`Task`] is the only persisted entity. [`Day`], [`Week`] and
//! [`WeekWindow`] are transient views rebuilt from repository results
//! whenever they are needed; they have no identity of their own.
//!
//! Display implementations for these models live in
//! [`crate::display`] to keep presentation out of the data definitions.

pub mod day;
pub mod status;
pub mod task;
pub mod week;
pub mod window;

pub use day::{Day, DayStats, PeakHours};
pub use status::{Category, Outcome, TaskStatus};
pub use task::Task;
pub use week::{monday_of, Week, WeekStats};
pub use window::WeekWindow;
