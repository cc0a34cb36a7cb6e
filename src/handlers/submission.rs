// src/handlers/submission.rs

use crate::{
    handlers::{IgnoreReason, Outcome, reject_if_submitted},
    models::{event::SessionNotice, submission::SubmitTrigger},
    state::SessionState,
};

/// Finalizes the session. The only path into the `Submitted` phase.
///
/// * A second call, from either trigger, is ignored.
/// * Manual submission is only offered on the last question.
/// * Both source subscriptions are cancelled before returning, so no tick or
///   visibility event can reach the queue afterwards.
pub fn submit(state: &mut SessionState, trigger: SubmitTrigger) -> Outcome {
    if let Some(rejected) = reject_if_submitted(state, "submit") {
        return rejected;
    }

    if trigger == SubmitTrigger::Manual && !state.session.is_on_last_question() {
        tracing::debug!(
            "Ignoring manual submit from {}",
            state.session.position_label()
        );
        return Outcome::Ignored(IgnoreReason::NotOnLastQuestion);
    }

    let payload = state.session.seal(trigger);
    state.subscriptions.cancel_all();

    tracing::info!(
        "Session {} submitted ({:?}): {}/{} answered, {} warnings, {}s left",
        payload.session_id,
        trigger,
        payload.answered_count,
        payload.total_count,
        payload.warning_count,
        payload.time_remaining_at_submission
    );

    state.submission = Some(payload.clone());
    state.emit(SessionNotice::Submitted(Box::new(payload)));
    Outcome::Applied
}

pub fn submit_manual(state: &mut SessionState) -> Outcome {
    submit(state, SubmitTrigger::Manual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{answer, flag, navigation, test_support::state};
    use crate::models::session::{Phase, Progress};
    use crate::sources::{ClockSource, ManualClock, ManualVisibility, VisibilitySource};
    use tokio::sync::mpsc;

    #[test]
    fn test_manual_submit_requires_last_question() {
        let mut state = state();
        assert_eq!(
            submit_manual(&mut state),
            Outcome::Ignored(IgnoreReason::NotOnLastQuestion)
        );
        assert_eq!(state.session.phase(), Phase::InProgress);

        navigation::go_to(&mut state, 2);
        assert!(submit_manual(&mut state).is_applied());
        assert_eq!(state.session.phase(), Phase::Submitted);
    }

    #[test]
    fn test_payload_summary() {
        let mut state = state();
        answer::set_answer(&mut state, 10, "Alpha".to_string());
        answer::set_answer(&mut state, 20, "text".to_string());
        flag::toggle_flag(&mut state, 30);
        navigation::go_to(&mut state, 2);
        submit_manual(&mut state);

        let payload = state.submission().unwrap();
        assert_eq!(payload.answered_count, 2);
        assert_eq!(payload.total_count, 3);
        assert_eq!(payload.time_remaining_at_submission, 7200);
        assert_eq!(payload.trigger, SubmitTrigger::Manual);
        assert!(payload.flagged.contains(&30));
        assert_eq!(payload.answers.get(&20).map(String::as_str), Some("text"));
        assert!(!payload.answers.contains_key(&30));
        assert_eq!(payload.summary(), "You answered 2 out of 3 questions.");
        assert_eq!(
            state.session.progress(),
            Progress {
                answered: 2,
                total: 3
            }
        );
        assert!(state.session.submitted_at().is_some());
    }

    #[test]
    fn test_second_trigger_is_ignored() {
        let mut state = state();
        navigation::go_to(&mut state, 2);
        assert!(submit_manual(&mut state).is_applied());
        let first = state.submission().cloned();

        assert_eq!(
            submit(&mut state, SubmitTrigger::TimerExpired),
            Outcome::Ignored(IgnoreReason::Submitted)
        );
        assert_eq!(
            submit_manual(&mut state),
            Outcome::Ignored(IgnoreReason::Submitted)
        );
        assert_eq!(state.submission().cloned(), first);

        let submitted = state
            .take_notices()
            .into_iter()
            .filter(|n| matches!(n, SessionNotice::Submitted(_)))
            .count();
        assert_eq!(submitted, 1);
    }

    #[test]
    fn test_submit_cancels_subscriptions() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let clock = ManualClock::default();
        let visibility = ManualVisibility::default();

        let mut state = state();
        state.attach(clock.subscribe(tx.clone()), visibility.subscribe(tx));
        assert!(state.has_live_subscriptions());

        navigation::go_to(&mut state, 2);
        submit_manual(&mut state);

        assert!(!state.has_live_subscriptions());
        assert!(!clock.is_subscribed());
        assert!(!visibility.is_subscribed());
    }
}
