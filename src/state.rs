// src/state.rs

use crate::{
    config::{
        Config, DEFAULT_DURATION_SECONDS, DEFAULT_LOW_TIME_THRESHOLD_SECONDS,
        DEFAULT_WARNING_THRESHOLD,
    },
    error::AppError,
    models::{
        event::SessionNotice, question::ExamPaper, session::Session,
        submission::SubmissionPayload,
    },
    sources::{Subscription, Subscriptions},
};

/// Knobs that shape notices but never the session's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub warning_threshold: u32,
    pub low_time_threshold_seconds: u32,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            low_time_threshold_seconds: DEFAULT_LOW_TIME_THRESHOLD_SECONDS,
        }
    }
}

/// Everything the handlers operate on: the session itself, the live source
/// subscriptions that the finalizer tears down, and an outbox of notices.
#[derive(Debug)]
pub struct SessionState {
    pub session: Session,
    pub policy: SessionPolicy,
    pub(crate) subscriptions: Subscriptions,
    pub(crate) low_time_notified: bool,
    pub(crate) submission: Option<SubmissionPayload>,
    torn_down: bool,
    outbox: Vec<SessionNotice>,
}

impl SessionState {
    pub fn new(session: Session, policy: SessionPolicy) -> Self {
        Self {
            session,
            policy,
            subscriptions: Subscriptions::default(),
            low_time_notified: false,
            submission: None,
            torn_down: false,
            outbox: Vec::new(),
        }
    }

    /// Duration precedence: configuration, then the paper, then the default.
    pub fn from_config(paper: ExamPaper, config: &Config) -> Result<Self, AppError> {
        let duration = config
            .duration_seconds
            .or(paper.duration_seconds)
            .unwrap_or(DEFAULT_DURATION_SECONDS);
        let session = Session::new(paper, duration)?;
        let policy = SessionPolicy {
            warning_threshold: config.warning_threshold,
            low_time_threshold_seconds: config.low_time_threshold_seconds,
        };
        Ok(Self::new(session, policy))
    }

    pub fn attach(&mut self, clock: Subscription, visibility: Subscription) {
        self.subscriptions.attach(clock, visibility);
    }

    pub fn has_live_subscriptions(&self) -> bool {
        self.subscriptions.is_live()
    }

    /// The payload, once the session has been submitted.
    pub fn submission(&self) -> Option<&SubmissionPayload> {
        self.submission.as_ref()
    }

    /// Set by `tear_down`. A torn-down session accepts no further changes.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn take_notices(&mut self) -> Vec<SessionNotice> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn emit(&mut self, notice: SessionNotice) {
        self.outbox.push(notice);
    }

    /// Abnormal end of the hosting view. Stops both sources and freezes the
    /// session wherever it was. No payload is produced.
    pub fn tear_down(&mut self) {
        if self.subscriptions.is_live() {
            tracing::info!("Tearing down session {} before submission", self.session.id());
        }
        self.subscriptions.cancel_all();
        self.torn_down = true;
    }
}
