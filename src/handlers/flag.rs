// src/handlers/flag.rs

use crate::{
    handlers::{IgnoreReason, Outcome, reject_if_submitted},
    state::SessionState,
};

/// Flags `question_id` for review, or clears the flag if already set.
pub fn toggle_flag(state: &mut SessionState, question_id: i64) -> Outcome {
    if let Some(rejected) = reject_if_submitted(state, "flag toggle") {
        return rejected;
    }

    if !state.session.questions().contains(question_id) {
        tracing::warn!("Ignoring flag toggle for unknown question {}", question_id);
        return Outcome::Ignored(IgnoreReason::UnknownQuestion);
    }

    if !state.session.flagged.remove(&question_id) {
        state.session.flagged.insert(question_id);
    }
    Outcome::Applied
}

pub fn toggle_current(state: &mut SessionState) -> Outcome {
    let question_id = state.session.current_question().id;
    toggle_flag(state, question_id)
}
