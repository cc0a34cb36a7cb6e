// src/routes.rs

use crate::{
    handlers::{IgnoreReason, Outcome, answer, flag, integrity, navigation, submission, timer},
    models::event::{SessionEvent, SessionNotice, SessionSnapshot},
    state::SessionState,
    utils::time::format_clock,
};

/// The single state-transition function.
///
/// Every event, whatever its source, goes through here one at a time and runs
/// to completion before the next one is looked at.
pub fn dispatch(state: &mut SessionState, event: SessionEvent) -> Outcome {
    match event {
        SessionEvent::Tick => timer::tick(state),
        SessionEvent::FocusLost => integrity::focus_lost(state),
        SessionEvent::FocusRegained => integrity::focus_regained(state),
        SessionEvent::GoTo(index) => navigation::go_to(state, index),
        SessionEvent::Next => navigation::next(state),
        SessionEvent::Previous => navigation::previous(state),
        SessionEvent::SetAnswer { question_id, value } => {
            answer::set_answer(state, question_id, value)
        }
        SessionEvent::AnswerCurrent(value) => answer::answer_current(state, value),
        SessionEvent::ChooseOption(option_number) => answer::choose_option(state, option_number),
        SessionEvent::ToggleFlag(question_id) => flag::toggle_flag(state, question_id),
        SessionEvent::ToggleFlagCurrent => flag::toggle_current(state),
        SessionEvent::Submit => submission::submit_manual(state),
        SessionEvent::Describe => {
            let snapshot = snapshot(state);
            state.emit(SessionNotice::Snapshot(Box::new(snapshot)));
            Outcome::Applied
        }
        SessionEvent::Teardown => {
            if state.is_torn_down() {
                return Outcome::Ignored(IgnoreReason::TornDown);
            }
            state.tear_down();
            Outcome::Applied
        }
    }
}

pub fn snapshot(state: &SessionState) -> SessionSnapshot {
    let session = &state.session;
    let question = session.current_question();
    SessionSnapshot {
        title: session.title().to_string(),
        position_label: session.position_label(),
        question: question.clone(),
        current_answer: session.current_answer().map(str::to_string),
        flagged: session.is_flagged(question.id),
        on_last_question: session.is_on_last_question(),
        progress: session.progress(),
        remaining_seconds: session.remaining_seconds(),
        clock: format_clock(session.remaining_seconds()),
        warning_count: session.warning_count(),
        tiles: session.tiles(),
        phase: session.phase(),
    }
}
