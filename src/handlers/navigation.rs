// src/handlers/navigation.rs

use crate::{
    handlers::{IgnoreReason, Outcome, reject_if_submitted},
    state::SessionState,
};

/// Jumps to `index` (0-based). Out-of-range indices leave the position unchanged.
pub fn go_to(state: &mut SessionState, index: usize) -> Outcome {
    if let Some(rejected) = reject_if_submitted(state, "navigation") {
        return rejected;
    }

    if index >= state.session.question_count() {
        tracing::debug!(
            "Ignoring jump to {} (session has {} questions)",
            index,
            state.session.question_count()
        );
        return Outcome::Ignored(IgnoreReason::OutOfRange);
    }

    state.session.current_index = index;
    Outcome::Applied
}

/// Clamped at the last question.
pub fn next(state: &mut SessionState) -> Outcome {
    if let Some(rejected) = reject_if_submitted(state, "navigation") {
        return rejected;
    }
    if state.session.is_on_last_question() {
        return Outcome::Ignored(IgnoreReason::AtBoundary);
    }
    let index = state.session.current_index() + 1;
    go_to(state, index)
}

/// Clamped at the first question.
pub fn previous(state: &mut SessionState) -> Outcome {
    if let Some(rejected) = reject_if_submitted(state, "navigation") {
        return rejected;
    }
    match state.session.current_index().checked_sub(1) {
        Some(index) => go_to(state, index),
        None => Outcome::Ignored(IgnoreReason::AtBoundary),
    }
}
