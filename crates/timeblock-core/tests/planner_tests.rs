mod common;

use std::sync::Arc;

use common::{create_test_repository, day, task, ScriptedLlm};
use jiff::civil::datetime;
use timeblock_core::{
    FixedClock, PlannerBuilder, Repository, ScheduleError, Scheduler,
};

const INVALID: &str = r#"Here you go:
```json
{"summary": "Too early", "schedule": {"2025-01-20": [
  {"description": "Write", "category": "deep", "start": "07:00", "end": "08:00"}
]}}
```"#;

const VALID: &str = r#"{"summary": "Afternoon focus", "schedule": {"2025-01-20": [
  {"description": "Write", "category": "deep", "start": "13:00", "end": "15:00"}
], "2025-01-21": [
  {"description": "Write", "category": "deep", "start": "09:00", "end": "11:00"}
]}}"#;

/// Monday 2025-01-20, 10:23.
fn clock() -> FixedClock {
    FixedClock(datetime(2025, 1, 20, 10, 23, 0, 0))
}

#[tokio::test]
async fn test_always_invalid_makes_every_attempt() {
    let (_temp_dir, repository) = create_test_repository().await;
    let llm = Arc::new(ScriptedLlm::new(&[INVALID, INVALID, INVALID]));
    let mut planner = PlannerBuilder::new()
        .with_llm_client(llm.clone())
        .with_repository(repository)
        .with_clock(clock())
        .build()
        .await
        .unwrap();

    let result = planner.plan_with_retry("Write today", 2).await.unwrap();
    assert_eq!(llm.calls(), 3);
    assert_eq!(result.attempts, 3);
    assert!(result.has_validation_errors());
    assert!(result.validation_errors[0].message.contains("past"));
}

#[tokio::test]
async fn test_plan_refine_and_save() {
    let (_temp_dir, repository) = create_test_repository().await;
    repository
        .create_task(&task("Standup", "2025-01-21", "11:00", "11:15"))
        .await
        .unwrap();

    let llm = Arc::new(ScriptedLlm::new(&[INVALID, VALID, VALID]));
    let mut planner = PlannerBuilder::new()
        .with_llm_client(llm.clone())
        .with_repository(repository.clone())
        .with_scheduler(Scheduler::default())
        .with_clock(clock())
        .build()
        .await
        .unwrap();

    let result = planner.plan_with_retry("Four hours of writing", 2).await.unwrap();
    assert_eq!(llm.calls(), 2);
    assert_eq!(result.attempts, 2);
    assert!(!result.has_validation_errors());
    assert_eq!(result.total_minutes(), 240);

    let refined = planner
        .continue_planning("Keep it as is", 0)
        .await
        .unwrap();
    assert_eq!(llm.calls(), 3);

    let saved = planner.save(&refined).await.unwrap();
    assert_eq!(saved.len(), 2);

    let stored = repository
        .list_tasks_by_date_range(day("2025-01-20"), day("2025-01-21"))
        .await
        .unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].scheduled_start, "13:00");
}

#[tokio::test]
async fn test_save_reports_conflicts_after_planning() {
    let (_temp_dir, repository) = create_test_repository().await;
    let llm = Arc::new(ScriptedLlm::new(&[VALID]));
    let mut planner = PlannerBuilder::new()
        .with_llm_client(llm)
        .with_repository(repository.clone())
        .with_clock(clock())
        .build()
        .await
        .unwrap();

    let result = planner.plan_with_retry("Write", 0).await.unwrap();

    // Someone books the slot between planning and saving.
    repository
        .create_task(&task("Meeting", "2025-01-21", "10:00", "10:30"))
        .await
        .unwrap();

    let err = planner.save(&result).await.unwrap_err();
    assert!(matches!(err, ScheduleError::Overlap { .. }));
    let stored = repository
        .list_tasks_by_date_range(day("2025-01-20"), day("2025-01-21"))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_transport_failure_surfaces_attempt() {
    let (_temp_dir, repository) = create_test_repository().await;
    let mut planner = PlannerBuilder::new()
        .with_llm_client(Arc::new(ScriptedLlm::new(&[INVALID])))
        .with_repository(repository)
        .with_clock(clock())
        .build()
        .await
        .unwrap();

    let err = planner.plan_with_retry("Write", 3).await.unwrap_err();
    assert!(matches!(err, ScheduleError::Llm { attempt: 2, .. }));
}
