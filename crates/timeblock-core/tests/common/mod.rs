#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use jiff::civil::{date, Date};
use tempfile::{NamedTempFile, TempDir};
use timeblock_core::{
    llm::{LlmClient, LlmError, Message},
    CreateTask, Database, SqliteRepository, Task,
};

/// Helper function to create a temporary database for testing
pub fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

/// Helper function to create a repository in a fresh directory
pub async fn create_test_repository() -> (TempDir, Arc<SqliteRepository>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repository = SqliteRepository::open(temp_dir.path().join("test.db"))
        .await
        .expect("Failed to open repository");
    (temp_dir, Arc::new(repository))
}

/// Builds an unsaved task; panics on invalid fields.
pub fn task(description: &str, day: &str, start: &str, end: &str) -> Task {
    Task::new(
        &CreateTask {
            description: description.to_string(),
            category: "deep".to_string(),
            scheduled_date: Some(day.to_string()),
            scheduled_start: start.to_string(),
            scheduled_end: end.to_string(),
        },
        date(2025, 1, 1),
    )
    .expect("Failed to build task")
}

pub fn day(value: &str) -> Date {
    value.parse().expect("Invalid date")
}

/// LLM stand-in returning canned replies in order.
pub struct ScriptedLlm {
    responses: Vec<String>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new(responses: &[&str]) -> Self {
        Self {
            responses: responses.iter().map(|r| r.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat(&self, _messages: &[Message]) -> Result<String, LlmError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(call)
            .cloned()
            .ok_or_else(|| LlmError::InvalidResponse("script exhausted".to_string()))
    }
}
