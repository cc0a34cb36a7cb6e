// src/handlers/timer.rs

use crate::{
    handlers::{Outcome, reject_if_submitted, submission},
    models::{event::SessionNotice, submission::SubmitTrigger},
    state::SessionState,
};

/// One clock tick: one second off the countdown. Reaching zero submits.
pub fn tick(state: &mut SessionState) -> Outcome {
    if let Some(rejected) = reject_if_submitted(state, "tick") {
        return rejected;
    }

    let remaining = state.session.timer.tick();
    state.emit(SessionNotice::TimerTick {
        remaining_seconds: remaining,
    });

    if remaining > 0
        && !state.low_time_notified
        && remaining < state.policy.low_time_threshold_seconds
    {
        state.low_time_notified = true;
        tracing::info!(
            "Session {} has {}s left",
            state.session.id(),
            remaining
        );
        state.emit(SessionNotice::LowTime {
            remaining_seconds: remaining,
        });
    }

    if state.session.timer.is_expired() {
        tracing::info!("Time expired for session {}", state.session.id());
        return submission::submit(state, SubmitTrigger::TimerExpired);
    }

    Outcome::Applied
}
