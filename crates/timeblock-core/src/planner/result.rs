//! Outcome of a planning round and the model's response format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    time::{is_valid_hhmm, to_minutes},
    validator::{ProposedTask, ValidationError},
};

/// JSON document the model is asked to return.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PlanResponse {
    #[serde(default)]
    pub summary: String,
    /// Date (`YYYY-MM-DD`) to the tasks proposed for it
    #[serde(default)]
    pub schedule: BTreeMap<String, Vec<ProposedTask>>,
}

impl PlanResponse {
    /// Flattens the schedule in date order, filling each task's date from
    /// its key.
    pub fn into_proposals(self) -> (String, Vec<ProposedTask>) {
        let proposals = self
            .schedule
            .into_iter()
            .flat_map(|(date, tasks)| {
                tasks.into_iter().map(move |task| ProposedTask {
                    date: date.clone(),
                    ..task
                })
            })
            .collect();
        (self.summary, proposals)
    }
}

/// A proposed schedule, possibly still carrying validation problems.
///
/// `task_index` in each validation error points into `proposals`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResult {
    pub summary: String,
    pub proposals: Vec<ProposedTask>,
    pub validation_errors: Vec<ValidationError>,
    /// Model reply the proposals were parsed from
    pub raw_response: String,
    /// LLM calls made to reach this result
    pub attempts: usize,
}

impl PlanResult {
    pub fn has_validation_errors(&self) -> bool {
        !self.validation_errors.is_empty()
    }

    /// Proposals grouped by their date string, dates in ascending order.
    pub fn proposals_by_date(&self) -> BTreeMap<&str, Vec<&ProposedTask>> {
        let mut grouped: BTreeMap<&str, Vec<&ProposedTask>> = BTreeMap::new();
        for task in &self.proposals {
            grouped.entry(task.date.as_str()).or_default().push(task);
        }
        grouped
    }

    /// Minutes across proposals with well-formed times; others count as 0.
    pub fn total_minutes(&self) -> u32 {
        self.proposals
            .iter()
            .filter(|t| is_valid_hhmm(&t.start) && is_valid_hhmm(&t.end))
            .map(|t| to_minutes(&t.end).saturating_sub(to_minutes(&t.start)))
            .sum()
    }
}
