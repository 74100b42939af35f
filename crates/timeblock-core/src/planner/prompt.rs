//! Prompt construction for planning sessions.

use std::{collections::BTreeMap, fmt::Write};

use crate::{
    models::Task,
    scheduler::SchedulingContext,
    time::{format_minutes, round_to_slot, MINUTES_PER_DAY, SLOT_MINUTES},
};

const SYSTEM_PROMPT: &str = r#"You are a scheduling assistant. You turn a request into concrete time blocks.

Rules:
- Every task is either "deep" (focused, demanding work) or "shallow" (administrative, low-focus work).
- Dates use YYYY-MM-DD and times use 24-hour HH:MM.
- Every task must end after it starts.
- Tasks on the same date must not overlap each other or any existing scheduled task.
- Nothing may start before the current time today.
- Keep tasks inside working hours on workdays unless the request asks otherwise.
- Put deep work inside peak hours when peak hours are given.
- Align starts and ends to 15-minute boundaries.
- Prefer the suggested time windows for tasks that recur.

Reply with JSON only, in exactly this shape:
{"summary": "one or two sentences about the plan", "schedule": {"YYYY-MM-DD": [{"description": "...", "category": "deep", "start": "HH:MM", "end": "HH:MM"}]}}

When asked to fix problems, reply with the complete corrected schedule in the same shape."#;

/// Usual placement of a recurring task, from past and planned occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedWindow {
    pub description: String,
    pub occurrences: usize,
    pub start: String,
    pub end: String,
}

pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

fn median(values: &mut [u32]) -> u32 {
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2
    } else {
        values[mid]
    }
}

/// Median start and end, rounded to the nearest quarter hour, for every
/// description seen at least twice.
///
/// Descriptions must match exactly. Results are ordered by description.
pub fn suggested_windows(tasks: &[Task]) -> Vec<SuggestedWindow> {
    let mut by_description: BTreeMap<&str, (Vec<u32>, Vec<u32>)> = BTreeMap::new();
    for task in tasks {
        let (starts, ends) = by_description.entry(task.description.as_str()).or_default();
        starts.push(task.start_minutes());
        ends.push(task.end_minutes());
    }

    by_description
        .into_iter()
        .filter(|(_, (starts, _))| starts.len() >= 2)
        .map(|(description, (mut starts, mut ends))| {
            let start = round_to_slot(median(&mut starts)).min(MINUTES_PER_DAY - SLOT_MINUTES);
            let mut end = round_to_slot(median(&mut ends));
            if end <= start {
                end = start + SLOT_MINUTES;
            }
            SuggestedWindow {
                description: description.to_string(),
                occurrences: starts.len(),
                start: format_minutes(start),
                end: format_minutes(end),
            }
        })
        .collect()
}

fn write_task_list(out: &mut String, tasks: &[&Task], with_status: bool) {
    if tasks.is_empty() {
        out.push_str("- none\n");
        return;
    }
    for task in tasks {
        let _ = write!(
            out,
            "- {} {}-{} {} [{}]",
            task.scheduled_date,
            task.scheduled_start,
            task.scheduled_end,
            task.description,
            task.category.as_str()
        );
        if with_status {
            let _ = write!(out, " ({}", task.status.as_str());
            if let Some(outcome) = task.outcome {
                let _ = write!(out, ", outcome: {}", outcome.as_str());
            }
            out.push(')');
        }
        out.push('\n');
    }
}

/// The context message sent ahead of the user's request.
pub fn context_message(context: &SchedulingContext, existing: &[Task], history: &[Task]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Current time: {} {:02}:{:02} ({})",
        context.today,
        context.now.hour(),
        context.now.minute(),
        context.weekday
    );
    let workdays = if context.workdays.is_empty() {
        "none configured".to_string()
    } else {
        context.workdays.join(", ")
    };
    let _ = writeln!(out, "Workdays: {workdays}");
    let _ = writeln!(out, "Working hours: {}-{}", context.day_start, context.day_end);
    if let Some(peak) = &context.peak_hours {
        let _ = writeln!(out, "Peak hours: {}-{}", peak.start, peak.end);
    }
    let _ = writeln!(
        out,
        "Next available slot: {} at {}",
        context.next_slot.date, context.next_slot.start
    );

    out.push_str("\nExisting scheduled tasks:\n");
    let scheduled: Vec<&Task> = existing.iter().filter(|t| t.is_scheduled()).collect();
    write_task_list(&mut out, &scheduled, false);

    out.push_str("\nRecent history (last 14 days):\n");
    let past: Vec<&Task> = history.iter().collect();
    write_task_list(&mut out, &past, true);

    let windows = suggested_windows(history);
    if !windows.is_empty() {
        out.push_str("\nSuggested time windows for recurring tasks:\n");
        for window in windows {
            let _ = writeln!(
                out,
                "- \"{}\": {}-{} (seen {} times)",
                window.description, window.start, window.end, window.occurrences
            );
        }
    }

    out
}
