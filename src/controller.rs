// src/controller.rs

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    handlers::{IgnoreReason, Outcome},
    models::{
        event::{SessionEvent, SessionNotice},
        session::Session,
        submission::SubmissionPayload,
    },
    routes,
    sources::{ClockSource, EventSender, VisibilitySource},
    state::SessionState,
};

/// Runs one candidate's session.
///
/// Clock ticks, visibility changes and candidate actions all arrive on one
/// unbounded queue and are applied strictly in arrival order. Notices produced
/// by each event are forwarded to the presentation channel before the next
/// event is taken.
pub struct SessionController {
    state: SessionState,
    sender: EventSender,
    events: UnboundedReceiver<SessionEvent>,
    notices: Option<UnboundedSender<SessionNotice>>,
}

impl SessionController {
    pub fn new(state: SessionState) -> Self {
        let (sender, events) = mpsc::unbounded_channel();
        Self {
            state,
            sender,
            events,
            notices: None,
        }
    }

    /// Forward notices (alerts, ticks, snapshots, the payload) to `notices`.
    pub fn with_notices(mut self, notices: UnboundedSender<SessionNotice>) -> Self {
        self.notices = Some(notices);
        self
    }

    /// Handle for candidate actions.
    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Subscribes both sources to the queue.
    pub fn start(&mut self, clock: &dyn ClockSource, visibility: &dyn VisibilitySource) {
        let clock_sub = clock.subscribe(self.sender.clone());
        let visibility_sub = visibility.subscribe(self.sender.clone());
        self.state.attach(clock_sub, visibility_sub);
        tracing::info!(
            "Session {} started: \"{}\", {} questions, {}s",
            self.state.session.id(),
            self.state.session.title(),
            self.state.session.question_count(),
            self.state.session.remaining_seconds()
        );
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.state.session
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_torn_down() || self.state.session.is_submitted()
    }

    /// Applies one event synchronously.
    pub fn handle(&mut self, event: SessionEvent) -> Outcome {
        if self.state.is_torn_down() {
            tracing::debug!("Ignoring {:?} after teardown", event);
            return Outcome::Ignored(IgnoreReason::TornDown);
        }

        let outcome = routes::dispatch(&mut self.state, event);
        self.flush_notices();
        outcome
    }

    /// Applies every event already waiting on the queue, in order.
    /// Returns how many were taken.
    pub fn pump(&mut self) -> usize {
        let mut taken = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle(event);
            taken += 1;
        }
        taken
    }

    /// Processes events until the session is submitted (returning the payload)
    /// or torn down (returning `None`).
    pub async fn run(&mut self) -> Option<SubmissionPayload> {
        while !self.is_finished() {
            match self.events.recv().await {
                Some(event) => {
                    self.handle(event);
                }
                None => break,
            }
        }
        self.state.submission().cloned()
    }

    pub fn tear_down(&mut self) {
        self.handle(SessionEvent::Teardown);
    }

    fn flush_notices(&mut self) {
        let notices = self.state.take_notices();
        let Some(sink) = &self.notices else {
            return;
        };
        for notice in notices {
            tracing::trace!("Forwarding {} notice", notice.event_name());
            if sink.send(notice).is_err() {
                tracing::debug!("Notice receiver dropped");
                break;
            }
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.state.tear_down();
    }
}
