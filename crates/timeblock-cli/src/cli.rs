//! Command handlers.
//!
//! Each handler calls the core, wraps the outcome in a display type and hands
//! the markdown to the [`TerminalRenderer`].

use std::{fmt::Write as _, io, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use jiff::civil::Date;
use log::{debug, info};
use timeblock_core::{
    display::{CreateResult, PostponeResult, UpdateResult},
    llm::OpenAiCompatClient,
    models::{Day, Week, WeekWindow},
    time::{add_days, parse_date},
    Clock, CreateTask, LlmConfig, PlanResult, Planner, PlannerBuilder, PostponeTask, Repository,
    Scheduler, SqliteRepository, SystemClock, Task, TaskTimeUpdate,
};

use crate::{
    args::{AddArgs, DayArgs, EditArgs, MoveArgs, OutcomeArgs, PlanArgs, PostponeArgs, WeekArgs},
    renderer::TerminalRenderer,
};

/// What the user typed after seeing a proposal.
#[derive(Debug, PartialEq, Eq)]
enum Reply {
    Save,
    Quit,
    Feedback(String),
}

impl Reply {
    /// Empty input or `y` saves, `q` quits, anything else is feedback.
    /// End of input quits.
    fn parse(line: Option<&str>) -> Self {
        match line.map(str::trim) {
            None => Reply::Quit,
            Some("") => Reply::Save,
            Some(s) if s.eq_ignore_ascii_case("y") => Reply::Save,
            Some(s) if s.eq_ignore_ascii_case("q") => Reply::Quit,
            Some(s) => Reply::Feedback(s.to_string()),
        }
    }
}

pub struct Cli {
    repository: Arc<SqliteRepository>,
    scheduler: Scheduler,
    llm_config: LlmConfig,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(
        repository: Arc<SqliteRepository>,
        scheduler: Scheduler,
        llm_config: LlmConfig,
        renderer: TerminalRenderer,
    ) -> Self {
        Self {
            repository,
            scheduler,
            llm_config,
            renderer,
        }
    }

    fn today(&self) -> Date {
        SystemClock.now().date()
    }

    fn resolve_date(&self, value: Option<&str>) -> Result<Date> {
        match value {
            Some(value) => parse_date(value)
                .ok_or_else(|| anyhow!("Invalid date '{value}': expected YYYY-MM-DD")),
            None => Ok(self.today()),
        }
    }

    pub async fn add(&self, args: AddArgs) -> Result<()> {
        let task = Task::new(&CreateTask::from(args), self.today())?;
        let created = self
            .repository
            .create_task(&task)
            .await
            .context("Failed to add task")?;
        self.renderer.render(&CreateResult::new(created).to_string())
    }

    pub async fn show_day(&self, args: &DayArgs) -> Result<()> {
        let date = self.resolve_date(args.date.as_deref())?;
        let mut day = Day::new(date);
        for task in self.repository.list_tasks_by_date_range(date, date).await? {
            day.insert(task)?;
        }

        let mut output = day.to_string();
        if let Some(peak) = self.scheduler.peak_hours() {
            if !day.is_empty() {
                let _ = writeln!(output, "\n{}", day.compute_stats(Some(peak)));
            }
        }
        self.renderer.render(&output)
    }

    pub async fn show_week(&self, args: &WeekArgs) -> Result<()> {
        let date = self.resolve_date(args.date.as_deref())?;
        let current = Week::build(date);

        if args.window {
            let first = current.previous_monday();
            let last = add_days(current.next_monday(), 6);
            let tasks = self
                .repository
                .list_tasks_by_date_range(first, last)
                .await?;
            let window = WeekWindow::new(
                Week::build_from_tasks(first, tasks.iter().cloned())?,
                Week::build_from_tasks(date, tasks.iter().cloned())?,
                Week::build_from_tasks(current.next_monday(), tasks)?,
            );
            let stats = window.current().stats(self.scheduler.peak_hours());
            return self.renderer.render(&format!("{window}\n{stats}"));
        }

        let tasks = self
            .repository
            .list_tasks_by_date_range(current.monday(), current.sunday())
            .await?;
        let week = Week::build_from_tasks(date, tasks)?;
        let stats = week.stats(self.scheduler.peak_hours());
        self.renderer.render(&format!("{week}\n{stats}"))
    }

    pub fn next_slot(&self) -> Result<()> {
        let slot = self.scheduler.next_available_start(SystemClock.now());
        self.renderer.render(&slot.to_string())
    }

    pub async fn cancel(&self, id: u64) -> Result<()> {
        let task = self.repository.cancel_task(id).await?;
        let result = UpdateResult::with_changes(task, vec!["status: cancelled".to_string()]);
        self.renderer.render(&result.to_string())
    }

    pub async fn postpone(&self, args: PostponeArgs) -> Result<()> {
        let params = PostponeTask::from(args);
        let (original, replacement) = self.repository.postpone_task(&params).await?;
        let result = PostponeResult {
            original,
            replacement,
        };
        self.renderer.render(&result.to_string())
    }

    pub async fn outcome(&self, args: &OutcomeArgs) -> Result<()> {
        let outcome = args.outcome.into();
        let task = self
            .repository
            .set_task_outcome(args.id, outcome, SystemClock.now())
            .await?;
        let result = UpdateResult::with_changes(task, vec![format!("outcome: {outcome}")]);
        self.renderer.render(&result.to_string())
    }

    pub async fn edit(&self, args: &EditArgs) -> Result<()> {
        let task = self
            .repository
            .update_task_description(args.id, &args.description)
            .await?;
        let change = format!("description: {}", task.description);
        self.renderer
            .render(&UpdateResult::with_changes(task, vec![change]).to_string())
    }

    pub async fn move_task(&self, args: MoveArgs) -> Result<()> {
        let update = TaskTimeUpdate::from(args);
        let task = self
            .repository
            .batch_update_task_times(std::slice::from_ref(&update))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Task {} was not updated", update.id))?;
        let change = format!("time: {}-{}", task.scheduled_start, task.scheduled_end);
        self.renderer
            .render(&UpdateResult::with_changes(task, vec![change]).to_string())
    }

    pub async fn plan(&self, args: &PlanArgs) -> Result<()> {
        let llm = OpenAiCompatClient::from_config(&self.llm_config)
            .context("Failed to set up the planning assistant")?;
        let repository: Arc<dyn Repository> = self.repository.clone();
        let mut planner = PlannerBuilder::new()
            .with_llm(llm)
            .with_repository(repository)
            .with_scheduler(self.scheduler.clone())
            .build()
            .await
            .context("Failed to initialize planner")?;

        let max_retries = args.max_retries.unwrap_or(self.llm_config.max_retries);
        info!("Planning with up to {max_retries} retries");
        let mut result = planner.plan_with_retry(&args.intent, max_retries).await?;

        loop {
            self.renderer.render(&result.to_string())?;

            if args.yes {
                return self.save_plan(&planner, &result).await;
            }

            let line = self
                .renderer
                .prompt("Enter or 'y' to save, 'q' to quit, or describe changes: ")
                .await?;
            match Reply::parse(line.as_deref()) {
                Reply::Save if result.has_validation_errors() => {
                    self.renderer.render(
                        "This plan still has problems. Describe a change or press 'q' to quit.\n",
                    )?;
                }
                Reply::Save => return self.save_plan(&planner, &result).await,
                Reply::Quit => return self.renderer.render("Plan discarded.\n"),
                Reply::Feedback(feedback) => {
                    debug!("Refining plan with feedback: {feedback}");
                    result = planner.continue_planning(&feedback, max_retries).await?;
                }
            }
        }
    }

    async fn save_plan(&self, planner: &Planner, result: &PlanResult) -> Result<()> {
        if result.has_validation_errors() {
            bail!(
                "Plan still has {} problem(s) after {} attempt(s); nothing was saved",
                result.validation_errors.len(),
                result.attempts
            );
        }
        let saved = planner.save(result).await.context("Failed to save plan")?;
        self.renderer.render(&CreateResult::new(saved).to_string())
    }
}

/// Reads one line from stdin on the blocking pool. `None` at end of input.
pub async fn read_line() -> Result<Option<String>> {
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        let read = io::stdin().read_line(&mut line)?;
        Ok::<_, io::Error>((read > 0).then_some(line))
    })
    .await
    .context("Input task failed")?
    .context("Failed to read from stdin")
}
