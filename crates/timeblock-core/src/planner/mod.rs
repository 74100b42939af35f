//! Conversational, LLM-assisted planning.
//!
//! A [`Planner`] holds one planning session at a time:
//!
//! ```text
//! plan_with_retry ──▶ snapshot tasks ──▶ prompt ──▶ LLM ──▶ validate ─┐
//!                                          ▲                           │
//!                                          └──── feedback (retry) ◀────┘
//! continue_planning ──▶ user feedback ──▶ same loop, same snapshot
//! save ──▶ Task::new for every proposal ──▶ Repository::create_tasks
//! ```
//!
//! Validation problems never surface as errors. When retries run out the
//! last proposal is returned with its problems attached, and
//! [`Planner::save`] refuses it until the user refines it.
//!
//! # Usage
//!
//! ```rust,no_run
//! use timeblock_core::{
//!     config::Config, llm::OpenAiCompatClient, PlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None)?;
//! let mut planner = PlannerBuilder::new()
//!     .with_llm(OpenAiCompatClient::from_config(&config.llm)?)
//!     .with_scheduler(config.scheduler()?)
//!     .build()
//!     .await?;
//!
//! let result = planner
//!     .plan_with_retry("Two hours of writing every morning this week", 2)
//!     .await?;
//! println!("{result}");
//! if !result.has_validation_errors() {
//!     planner.save(&result).await?;
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use jiff::civil::DateTime;
use log::{debug, info, warn};

use crate::{
    error::{Result, ScheduleError},
    llm::{chat_json, LlmClient, Message},
    models::Task,
    params::CreateTask,
    repository::Repository,
    scheduler::Scheduler,
    time::add_days,
    validator::{format_feedback, Validator},
};

pub mod builder;
pub mod clock;
pub mod prompt;
pub mod result;


pub use builder::PlannerBuilder;
pub use clock::{Clock, FixedClock, SystemClock};
pub use result::PlanResult;

use result::PlanResponse;

/// Days ahead of today whose tasks are shown to the model and checked for
/// overlap.
pub const LOOKAHEAD_DAYS: i64 = 30;

/// Days before today summarized as history.
pub const HISTORY_DAYS: i64 = 14;

struct Session {
    messages: Vec<Message>,
    /// Tasks that existed when the session started
    existing: Vec<Task>,
    now: DateTime,
    /// Latest reply not yet appended to `messages`
    pending_response: Option<String>,
    last_result: Option<PlanResult>,
}

/// Planning session driver.
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    repository: Arc<dyn Repository>,
    scheduler: Scheduler,
    clock: Arc<dyn Clock>,
    session: Option<Session>,
}

impl Planner {
    pub(crate) fn new(
        llm: Arc<dyn LlmClient>,
        repository: Arc<dyn Repository>,
        scheduler: Scheduler,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            llm,
            repository,
            scheduler,
            clock,
            session: None,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repository
    }

    /// Current time as seen by the planner's clock.
    pub fn now(&self) -> DateTime {
        self.clock.now()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Conversation so far, empty without a session.
    pub fn messages(&self) -> &[Message] {
        self.session
            .as_ref()
            .map(|s| s.messages.as_slice())
            .unwrap_or_default()
    }

    pub fn last_result(&self) -> Option<&PlanResult> {
        self.session.as_ref().and_then(|s| s.last_result.as_ref())
    }

    /// Drops the current session.
    pub fn reset(&mut self) {
        self.session = None;
    }

    /// Starts a new session for `input` and runs up to `max_retries + 1`
    /// LLM calls until a proposal validates.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::Llm` when the model cannot be reached or its
    /// reply holds no usable JSON, and repository errors from the task
    /// snapshot. Validation problems are returned inside the result.
    pub async fn plan_with_retry(&mut self, input: &str, max_retries: usize) -> Result<PlanResult> {
        self.session = None;

        let now = self.clock.now();
        let today = now.date();
        let existing = self
            .repository
            .list_tasks_by_date_range(today, add_days(today, LOOKAHEAD_DAYS))
            .await?;
        let history = self
            .repository
            .list_tasks_by_date_range(add_days(today, -HISTORY_DAYS), add_days(today, -1))
            .await?;

        let context = self.scheduler.context(now);
        let context_message = prompt::context_message(&context, &existing, &history);
        info!(
            "Starting planning session: {} existing task(s), {} in history",
            existing.len(),
            history.len()
        );
        debug!("Context message is {} bytes", context_message.len());

        self.session = Some(Session {
            messages: vec![
                Message::system(prompt::system_prompt()),
                Message::user(context_message),
                Message::user(input),
            ],
            existing,
            now,
            pending_response: None,
            last_result: None,
        });

        self.run_attempts(max_retries).await
    }

    /// Refines the current proposal with user feedback, keeping the task
    /// snapshot taken when the session started.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::InvalidInput` when no session is active, and
    /// the same errors as [`Planner::plan_with_retry`] otherwise. On error the
    /// session is left as it was before the call.
    pub async fn continue_planning(
        &mut self,
        feedback: &str,
        max_retries: usize,
    ) -> Result<PlanResult> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or_else(|| {
            ScheduleError::invalid_input("session")
                .with_reason("no planning session in progress; start one with a request first")
        })?;

        let checkpoint = session.messages.len();
        let pending = session.pending_response.take();
        let last_result = session.last_result.clone();
        let started_at = std::mem::replace(&mut session.now, now);
        if let Some(previous) = &pending {
            session.messages.push(Message::assistant(previous.clone()));
        }
        session.messages.push(Message::user(feedback));

        let result = self.run_attempts(max_retries).await;
        if result.is_err() {
            if let Some(session) = self.session.as_mut() {
                debug!("Rolling conversation back to {checkpoint} message(s)");
                session.messages.truncate(checkpoint);
                session.pending_response = pending;
                session.last_result = last_result;
                session.now = started_at;
            }
        }
        result
    }

    async fn run_attempts(&mut self, max_retries: usize) -> Result<PlanResult> {
        let llm = Arc::clone(&self.llm);
        let session = self.session.as_mut().ok_or_else(|| {
            ScheduleError::invalid_input("session").with_reason("no planning session in progress")
        })?;
        let validator = Validator::new(session.now);

        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(
                "Planning attempt {attempt} of {} with {} message(s)",
                max_retries.saturating_add(1),
                session.messages.len()
            );

            let (response, raw): (PlanResponse, String) =
                chat_json(llm.as_ref(), &session.messages)
                    .await
                    .map_err(|source| ScheduleError::Llm { attempt, source })?;

            let (summary, proposals) = response.into_proposals();
            let validation = validator.validate(&proposals, &session.existing);
            let result = PlanResult {
                summary,
                proposals,
                validation_errors: validation.errors.clone(),
                raw_response: raw.clone(),
                attempts: attempt,
            };
            session.last_result = Some(result.clone());

            if validation.valid {
                info!(
                    "Plan with {} task(s) validated on attempt {attempt}",
                    result.proposals.len()
                );
                session.pending_response = Some(raw);
                return Ok(result);
            }

            if attempt > max_retries {
                warn!(
                    "Plan still has {} validation error(s) after {attempt} attempt(s)",
                    validation.errors.len()
                );
                session.pending_response = Some(raw);
                return Ok(result);
            }

            warn!(
                "Attempt {attempt} produced {} validation error(s), retrying",
                validation.errors.len()
            );
            session.messages.push(Message::assistant(raw));
            session
                .messages
                .push(Message::user(format_feedback(&validation)));
        }
    }

    /// Stores every proposal of `result` in one atomic batch.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::UnresolvedValidation` if the result still has
    /// validation errors, construction errors for malformed proposals and
    /// `ScheduleError::Overlap` if the schedule changed since planning.
    pub async fn save(&self, result: &PlanResult) -> Result<Vec<Task>> {
        if result.has_validation_errors() {
            return Err(ScheduleError::UnresolvedValidation {
                count: result.validation_errors.len(),
            });
        }

        let today = self.clock.now().date();
        let tasks = result
            .proposals
            .iter()
            .map(|proposal| {
                Task::new(
                    &CreateTask {
                        description: proposal.description.clone(),
                        category: proposal.category.clone(),
                        scheduled_date: Some(proposal.date.clone()),
                        scheduled_start: proposal.start.clone(),
                        scheduled_end: proposal.end.clone(),
                    },
                    today,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let saved = self.repository.create_tasks(&tasks).await?;
        info!("Saved {} planned task(s)", saved.len());
        Ok(saved)
    }
}
