// src/handlers/answer.rs

use crate::{
    handlers::{IgnoreReason, Outcome, reject_if_submitted},
    state::SessionState,
};

/// Records `value` for `question_id`, overwriting any earlier answer.
///
/// * Unknown ids are ignored.
/// * MultipleChoice values must match an option exactly; anything else is
///   rejected and the previous answer (if any) is kept.
/// * Free-text values are stored as given. An empty string counts as answered.
pub fn set_answer(state: &mut SessionState, question_id: i64, value: String) -> Outcome {
    if let Some(rejected) = reject_if_submitted(state, "answer") {
        return rejected;
    }

    let accepted = match state.session.questions().by_id(question_id) {
        Some(question) => question.accepts(&value),
        None => {
            tracing::warn!("Ignoring answer for unknown question {}", question_id);
            return Outcome::Ignored(IgnoreReason::UnknownQuestion);
        }
    };

    if !accepted {
        tracing::warn!(
            "Rejecting answer for question {}: not one of its options",
            question_id
        );
        return Outcome::Ignored(IgnoreReason::InvalidOption);
    }

    state.session.answers.insert(question_id, value);
    tracing::debug!(
        "Answer recorded for question {} ({}/{})",
        question_id,
        state.session.answered_count(),
        state.session.question_count()
    );
    Outcome::Applied
}

/// Answers the question currently on screen.
pub fn answer_current(state: &mut SessionState, value: String) -> Outcome {
    let question_id = state.session.current_question().id;
    set_answer(state, question_id, value)
}

/// Picks option `option_number` (1-based) of the current question.
pub fn choose_option(state: &mut SessionState, option_number: usize) -> Outcome {
    if let Some(rejected) = reject_if_submitted(state, "answer") {
        return rejected;
    }

    let question = state.session.current_question();
    if question.kind.is_free_text() {
        return Outcome::Ignored(IgnoreReason::InvalidOption);
    }
    let Some(option) = option_number
        .checked_sub(1)
        .and_then(|idx| question.options.get(idx))
        .cloned()
    else {
        return Outcome::Ignored(IgnoreReason::InvalidOption);
    };

    let question_id = question.id;
    set_answer(state, question_id, option)
}
