//! Command-line arguments.
//!
//! Argument structs stay clap-specific and convert into the core parameter
//! types, which carry raw strings and are validated by the core:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Business Logic
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use timeblock_core::{CreateTask, Outcome, PostponeTask, TaskTimeUpdate};

/// Time blocking for deep and shallow work
///
/// Schedule work in 15-minute aligned blocks, review days and weeks, and ask
/// a language model to propose a schedule that is checked against what is
/// already booked before anything is saved.
#[derive(Parser)]
#[command(version, about, name = "tb")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/timeblock/timeblock.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Path to the configuration file. Defaults to
    /// $XDG_CONFIG_HOME/timeblock/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands. Without one, today's schedule is shown.
#[derive(Subcommand)]
pub enum Commands {
    /// Schedule a new block
    #[command(alias = "a")]
    Add(AddArgs),
    /// Show the tasks of one day
    #[command(alias = "d")]
    Day(DayArgs),
    /// Show a week with its deep/shallow summary
    #[command(alias = "w")]
    Week(WeekArgs),
    /// Show the next start time inside working hours
    #[command(alias = "n")]
    Next,
    /// Cancel a scheduled task
    Cancel(IdArgs),
    /// Move a task to another date and time, keeping a link to the original
    Postpone(PostponeArgs),
    /// Record how a finished block went
    Outcome(OutcomeArgs),
    /// Change a task's description
    Edit(EditArgs),
    /// Change a task's start and end on the same date
    #[command(alias = "mv")]
    Move(MoveArgs),
    /// Ask the planning assistant for a schedule
    #[command(alias = "p")]
    Plan(PlanArgs),
}

#[derive(ClapArgs)]
pub struct AddArgs {
    /// What the block is for
    pub description: String,
    /// deep or shallow
    #[arg(short, long, default_value = "deep")]
    pub category: String,
    /// Date as YYYY-MM-DD; today when omitted
    #[arg(short, long)]
    pub date: Option<String>,
    /// Start time as HH:MM
    #[arg(short, long)]
    pub start: String,
    /// End time as HH:MM
    #[arg(short, long)]
    pub end: String,
}

impl From<AddArgs> for CreateTask {
    fn from(val: AddArgs) -> Self {
        CreateTask {
            description: val.description,
            category: val.category,
            scheduled_date: val.date,
            scheduled_start: val.start,
            scheduled_end: val.end,
        }
    }
}

#[derive(ClapArgs)]
pub struct DayArgs {
    /// Date as YYYY-MM-DD; today when omitted
    #[arg(short, long)]
    pub date: Option<String>,
}

#[derive(ClapArgs)]
pub struct WeekArgs {
    /// Any date inside the week; this week when omitted
    #[arg(short, long)]
    pub date: Option<String>,
    /// Also outline the previous and next week
    #[arg(long)]
    pub window: bool,
}

#[derive(ClapArgs)]
pub struct IdArgs {
    /// Task ID
    pub id: u64,
}

#[derive(ClapArgs)]
pub struct PostponeArgs {
    /// Task ID
    pub id: u64,
    /// New date as YYYY-MM-DD
    #[arg(short, long)]
    pub date: String,
    /// New start time as HH:MM
    #[arg(short, long)]
    pub start: String,
    /// New end time as HH:MM
    #[arg(short, long)]
    pub end: String,
}

impl From<PostponeArgs> for PostponeTask {
    fn from(val: PostponeArgs) -> Self {
        PostponeTask {
            id: val.id,
            scheduled_date: val.date,
            scheduled_start: val.start,
            scheduled_end: val.end,
        }
    }
}

#[derive(ClapArgs)]
pub struct OutcomeArgs {
    /// Task ID
    pub id: u64,
    pub outcome: OutcomeArg,
}

/// How long a block actually took compared to its slot.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutcomeArg {
    /// Finished within the slot
    #[value(name = "on_time", alias = "on-time")]
    OnTime,
    /// Ran past the slot
    Over,
    /// Finished early
    Under,
}

impl From<OutcomeArg> for Outcome {
    fn from(val: OutcomeArg) -> Self {
        match val {
            OutcomeArg::OnTime => Outcome::OnTime,
            OutcomeArg::Over => Outcome::Over,
            OutcomeArg::Under => Outcome::Under,
        }
    }
}

#[derive(ClapArgs)]
pub struct EditArgs {
    /// Task ID
    pub id: u64,
    /// New description
    pub description: String,
}

#[derive(ClapArgs)]
pub struct MoveArgs {
    /// Task ID
    pub id: u64,
    /// New start time as HH:MM
    #[arg(short, long)]
    pub start: String,
    /// New end time as HH:MM
    #[arg(short, long)]
    pub end: String,
}

impl From<MoveArgs> for TaskTimeUpdate {
    fn from(val: MoveArgs) -> Self {
        TaskTimeUpdate {
            id: val.id,
            scheduled_start: val.start,
            scheduled_end: val.end,
        }
    }
}

#[derive(ClapArgs)]
pub struct PlanArgs {
    /// What to plan, in plain words
    pub intent: String,
    /// Re-prompts allowed when a proposal fails validation; defaults to the
    /// configured value
    #[arg(long)]
    pub max_retries: Option<usize>,
    /// Save the first valid proposal without asking
    #[arg(short, long)]
    pub yes: bool,
}
