//! timeblock CLI application
//!
//! Command-line interface for scheduling deep and shallow work blocks.

mod args;
mod cli;
mod renderer;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands, DayArgs};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use timeblock_core::{Config, SqliteRepository};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        config,
        no_color,
        command,
    } = Args::parse();

    let config = Config::load(config.as_deref()).context("Failed to load configuration")?;
    let scheduler = config.scheduler().context("Invalid workday configuration")?;
    let database_path = match database_file {
        Some(path) => path,
        None => config.database_path()?,
    };

    let repository = SqliteRepository::open(&database_path)
        .await
        .context("Failed to open database")?;
    info!("timeblock started with database {}", database_path.display());

    let cli = Cli::new(
        Arc::new(repository),
        scheduler,
        config.llm,
        TerminalRenderer::new(!no_color),
    );

    match command {
        Some(Add(args)) => cli.add(args).await,
        Some(Day(args)) => cli.show_day(&args).await,
        Some(Week(args)) => cli.show_week(&args).await,
        Some(Next) => cli.next_slot(),
        Some(Cancel(args)) => cli.cancel(args.id).await,
        Some(Postpone(args)) => cli.postpone(args).await,
        Some(Outcome(args)) => cli.outcome(&args).await,
        Some(Edit(args)) => cli.edit(&args).await,
        Some(Move(args)) => cli.move_task(args).await,
        Some(Plan(args)) => cli.plan(&args).await,
        None => cli.show_day(&DayArgs { date: None }).await,
    }
}
