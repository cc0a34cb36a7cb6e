// src/models/session.rs

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        question::{ExamPaper, Question, QuestionSet},
        submission::{SubmissionPayload, SubmitTrigger},
    },
};

/// Two-state lifecycle. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    InProgress,
    Submitted,
}

/// Countdown. `remaining_seconds` never goes below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    remaining_seconds: u32,
    total_seconds: u32,
}

impl TimerState {
    pub fn new(total_seconds: u32) -> Self {
        Self {
            remaining_seconds: total_seconds,
            total_seconds,
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.total_seconds - self.remaining_seconds
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// One second passes. Clamped at zero.
    pub(crate) fn tick(&mut self) -> u32 {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusChange {
    Lost,
    Regained,
}

/// One entry of the integrity audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityEvent {
    pub sequence: u32,
    pub change: FocusChange,
    /// Counter value right after this event.
    pub warning_count: u32,
    pub at: DateTime<Utc>,
}

/// Monotonic counter of focus losses plus the literal event sequence.
#[derive(Debug, Clone, Default)]
pub struct IntegrityLog {
    warning_count: u32,
    /// Sequence number of the last recorded event.
    sequence: u32,
    events: Vec<IntegrityEvent>,
}

impl IntegrityLog {
    pub fn warning_count(&self) -> u32 {
        self.warning_count
    }

    pub fn events(&self) -> &[IntegrityEvent] {
        &self.events
    }

    /// Returns the new warning count.
    pub(crate) fn record_loss(&mut self, at: DateTime<Utc>) -> u32 {
        self.warning_count = self.warning_count.saturating_add(1);
        self.push(FocusChange::Lost, at);
        self.warning_count
    }

    pub(crate) fn record_regain(&mut self, at: DateTime<Utc>) {
        self.push(FocusChange::Regained, at);
    }

    fn push(&mut self, change: FocusChange, at: DateTime<Utc>) {
        self.sequence = self.sequence.saturating_add(1);
        self.events.push(IntegrityEvent {
            sequence: self.sequence,
            change,
            warning_count: self.warning_count,
            at,
        });
    }
}

/// Fraction of questions answered, kept as an exact ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }
}

/// One cell of the question navigation grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionTile {
    /// 1-based position.
    pub number: usize,
    pub question_id: i64,
    pub current: bool,
    pub answered: bool,
    pub flagged: bool,
}

/// The mutable core of one candidate's exam.
///
/// Fields that handlers mutate are crate-visible; `phase` is private and only
/// `seal` (called from the submission handler) writes it.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    title: String,
    subtitle: Option<String>,
    questions: QuestionSet,
    pub(crate) current_index: usize,
    pub(crate) answers: BTreeMap<i64, String>,
    pub(crate) flagged: BTreeSet<i64>,
    pub(crate) timer: TimerState,
    pub(crate) integrity: IntegrityLog,
    phase: Phase,
    started_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Opens a session on `paper` with a countdown of `duration_seconds`.
    pub fn new(paper: ExamPaper, duration_seconds: u32) -> Result<Self, AppError> {
        if duration_seconds == 0 {
            return Err(AppError::Config(
                "exam duration must be greater than zero".to_string(),
            ));
        }

        let questions = QuestionSet::new(paper.questions)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: paper.title,
            subtitle: paper.subtitle,
            questions,
            current_index: 0,
            answers: BTreeMap::new(),
            flagged: BTreeSet::new(),
            timer: TimerState::new(duration_seconds),
            integrity: IntegrityLog::default(),
            phase: Phase::InProgress,
            started_at: Utc::now(),
            submitted_at: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == Phase::Submitted
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        // current_index is kept in bounds by the navigation handlers
        &self.questions.as_slice()[self.current_index]
    }

    pub fn is_on_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    pub fn position_label(&self) -> String {
        format!(
            "Question {} of {}",
            self.current_index + 1,
            self.questions.len()
        )
    }

    pub fn answers(&self) -> &BTreeMap<i64, String> {
        &self.answers
    }

    pub fn answer(&self, question_id: i64) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.answer(self.current_question().id)
    }

    pub fn flagged(&self) -> &BTreeSet<i64> {
        &self.flagged
    }

    pub fn is_flagged(&self, question_id: i64) -> bool {
        self.flagged.contains(&question_id)
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.timer.remaining_seconds()
    }

    pub fn integrity(&self) -> &IntegrityLog {
        &self.integrity
    }

    pub fn warning_count(&self) -> u32 {
        self.integrity.warning_count()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.answers.len(),
            total: self.questions.len(),
        }
    }

    pub fn tiles(&self) -> Vec<QuestionTile> {
        self.questions
            .iter()
            .enumerate()
            .map(|(idx, q)| QuestionTile {
                number: idx + 1,
                question_id: q.id,
                current: idx == self.current_index,
                answered: self.answers.contains_key(&q.id),
                flagged: self.flagged.contains(&q.id),
            })
            .collect()
    }

    /// Moves the session into its terminal phase and builds the payload.
    /// Callers must have checked that the session is still in progress.
    pub(crate) fn seal(&mut self, trigger: SubmitTrigger) -> SubmissionPayload {
        let submitted_at = Utc::now();
        self.phase = Phase::Submitted;
        self.submitted_at = Some(submitted_at);

        SubmissionPayload {
            session_id: self.id.clone(),
            answers: self.answers.clone(),
            flagged: self.flagged.clone(),
            warning_count: self.integrity.warning_count(),
            time_remaining_at_submission: self.timer.remaining_seconds(),
            answered_count: self.answers.len(),
            total_count: self.questions.len(),
            trigger,
            started_at: self.started_at,
            submitted_at,
            integrity_events: self.integrity.events().to_vec(),
        }
    }
}
