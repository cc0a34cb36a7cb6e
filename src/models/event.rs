// src/models/event.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    question::Question,
    session::{Phase, Progress, QuestionTile},
    submission::SubmissionPayload,
};

/// Everything that can happen to a session. All sources (clock, visibility,
/// candidate) feed these through one queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// One second elapsed.
    Tick,
    /// The exam view lost foreground focus.
    FocusLost,
    FocusRegained,

    /// 0-based index.
    GoTo(usize),
    Next,
    Previous,

    SetAnswer { question_id: i64, value: String },
    /// Free text (or exact option text) for the question on screen.
    AnswerCurrent(String),
    /// 1-based option number of the question on screen.
    ChooseOption(usize),

    ToggleFlag(i64),
    ToggleFlagCurrent,

    /// Candidate pressed submit.
    Submit,

    /// Ask for a `Snapshot` notice. Read-only.
    Describe,

    /// Hosting view discarded before submission.
    Teardown,
}

/// Raised on every counted focus loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityAlert {
    pub warning_count: u32,
    /// Advisory; reaching it does not end the session.
    pub threshold: u32,
    pub threshold_reached: bool,
    pub at: DateTime<Utc>,
}

impl IntegrityAlert {
    pub fn message(&self) -> String {
        format!(
            "Warning: tab switch detected. This action has been recorded. Warnings: {}/{}",
            self.warning_count, self.threshold
        )
    }
}

/// Read-only view of what the candidate currently sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub title: String,
    pub position_label: String,
    pub question: Question,
    pub current_answer: Option<String>,
    pub flagged: bool,
    pub on_last_question: bool,
    pub progress: Progress,
    pub remaining_seconds: u32,
    pub clock: String,
    pub warning_count: u32,
    pub tiles: Vec<QuestionTile>,
    pub phase: Phase,
}

/// Outbound notifications for the presentation and results collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SessionNotice {
    TimerTick { remaining_seconds: u32 },
    /// Fired once when remaining time first drops under the low-time threshold.
    LowTime { remaining_seconds: u32 },
    IntegrityAlert(IntegrityAlert),
    Snapshot(Box<SessionSnapshot>),
    Submitted(Box<SubmissionPayload>),
}

impl SessionNotice {
    /// Same as the serialized `type` tag.
    pub fn event_name(&self) -> &'static str {
        match self {
            SessionNotice::TimerTick { .. } => "timer-tick",
            SessionNotice::LowTime { .. } => "low-time",
            SessionNotice::IntegrityAlert(_) => "integrity-alert",
            SessionNotice::Snapshot(_) => "snapshot",
            SessionNotice::Submitted(_) => "submitted",
        }
    }
}
