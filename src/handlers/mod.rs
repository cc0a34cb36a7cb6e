// src/handlers/mod.rs

pub mod answer;
pub mod flag;
pub mod integrity;
pub mod navigation;
pub mod submission;
pub mod timer;

use crate::state::SessionState;

/// Result of one operation. Operations never fail; they either change the
/// session or are ignored for a stated reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Session is in its terminal phase.
    Submitted,
    /// Controller was torn down.
    TornDown,
    OutOfRange,
    AtBoundary,
    UnknownQuestion,
    /// Value is not one of the question's options.
    InvalidOption,
    NotOnLastQuestion,
}

/// Common gate: every mutator checks the phase (and teardown) first.
pub(crate) fn reject_if_submitted(state: &SessionState, operation: &str) -> Option<Outcome> {
    if state.is_torn_down() {
        tracing::debug!(
            "Ignoring {} on torn-down session {}",
            operation,
            state.session.id()
        );
        return Some(Outcome::Ignored(IgnoreReason::TornDown));
    }
    if state.session.is_submitted() {
        tracing::debug!(
            "Ignoring {} on submitted session {}",
            operation,
            state.session.id()
        );
        return Some(Outcome::Ignored(IgnoreReason::Submitted));
    }
    None
}
