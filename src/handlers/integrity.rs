// src/handlers/integrity.rs

use chrono::Utc;

use crate::{
    handlers::{Outcome, reject_if_submitted},
    models::event::{IntegrityAlert, SessionNotice},
    state::SessionState,
};

/// Counts one focus loss and raises an alert carrying the new count.
///
/// Purely advisory: the threshold is reported on the alert but never forces
/// submission.
pub fn focus_lost(state: &mut SessionState) -> Outcome {
    if let Some(rejected) = reject_if_submitted(state, "focus loss") {
        return rejected;
    }

    let at = Utc::now();
    let warning_count = state.session.integrity.record_loss(at);
    let threshold = state.policy.warning_threshold;

    tracing::warn!(
        "Session {} left the exam view (warning {}/{})",
        state.session.id(),
        warning_count,
        threshold
    );

    state.emit(SessionNotice::IntegrityAlert(IntegrityAlert {
        warning_count,
        threshold,
        threshold_reached: threshold > 0 && warning_count >= threshold,
        at,
    }));
    Outcome::Applied
}

/// Logged to the audit trail, not counted.
pub fn focus_regained(state: &mut SessionState) -> Outcome {
    if let Some(rejected) = reject_if_submitted(state, "focus regain") {
        return rejected;
    }
    state.session.integrity.record_regain(Utc::now());
    Outcome::Applied
}
