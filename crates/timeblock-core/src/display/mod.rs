//! Markdown formatting for models and operation results.
//!
//! Domain types implement [`std::fmt::Display`] directly (see [`models`]);
//! wrapper types in [`results`] and [`datetime`] cover output that needs
//! extra context. The CLI renders the markdown through termimad.
//!
//! ```rust
//! use jiff::civil::date;
//! use timeblock_core::{display::Minutes, models::Week};
//!
//! let week = Week::build(date(2025, 1, 22));
//! assert!(week.to_string().starts_with("# Week of 2025-01-20 to 2025-01-26"));
//! assert_eq!(Minutes(95).to_string(), "1h 35m");
//! ```

pub mod datetime;
pub mod models;
mod plan;
pub mod results;

pub use datetime::{DayHeading, LocalDateTime, Minutes};
pub use models::TaskLine;
pub use results::{CreateResult, PostponeResult, UpdateResult};
