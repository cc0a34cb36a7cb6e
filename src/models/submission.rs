// src/models/submission.rs

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::session::IntegrityEvent;

/// What caused the session to be finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitTrigger {
    /// Candidate pressed submit on the last question.
    Manual,
    /// Countdown reached zero.
    TimerExpired,
}

/// Handed to the results collaborator exactly once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub session_id: String,

    /// Question id -> final answer. Unanswered ids are absent.
    pub answers: BTreeMap<i64, String>,

    /// Informational only; flags carry no scoring meaning.
    pub flagged: BTreeSet<i64>,

    pub warning_count: u32,

    /// 0 when auto-submitted by expiry.
    pub time_remaining_at_submission: u32,

    pub answered_count: usize,
    pub total_count: usize,

    pub trigger: SubmitTrigger,
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,

    /// Audit trail behind `warning_count`.
    pub integrity_events: Vec<IntegrityEvent>,
}

impl SubmissionPayload {
    /// Summary line shown to the candidate after submission.
    pub fn summary(&self) -> String {
        format!(
            "You answered {} out of {} questions.",
            self.answered_count, self.total_count
        )
    }
}
