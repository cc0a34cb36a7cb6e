// tests/session_tests.rs

mod common;

use common::{drain, started, started_with_notices, state_with_duration};
use exam_session::{
    dispatch,
    handlers::{IgnoreReason, Outcome},
    models::{
        event::{SessionEvent, SessionNotice},
        session::{Phase, Progress},
        submission::SubmitTrigger,
    },
};

#[test]
fn scenario_a_timer_expiry_auto_submits() {
    // Arrange
    let mut h = started(7200);

    // Act: no interaction for the whole exam
    assert_eq!(h.clock.advance(7200), 7200);
    h.controller.pump();

    // Assert
    let session = h.controller.session();
    assert_eq!(session.phase(), Phase::Submitted);
    let payload = h.controller.state().submission().expect("payload");
    assert_eq!(payload.time_remaining_at_submission, 0);
    assert_eq!(payload.answered_count, 0);
    assert_eq!(payload.total_count, 6);
    assert_eq!(payload.trigger, SubmitTrigger::TimerExpired);

    // Sources were released by the finalizer
    assert!(!h.clock.is_subscribed());
    assert!(!h.visibility.is_subscribed());
    assert!(!h.clock.tick());
}

#[test]
fn scenario_b_manual_submit_with_one_unanswered() {
    // Arrange
    let mut state = state_with_duration(7200);
    let answers = [(1, "Paris"), (2, "4"), (3, "Jupiter"), (4, "F = ma"), (5, "100")];

    // Act
    for (id, value) in answers {
        let outcome = dispatch(
            &mut state,
            SessionEvent::SetAnswer {
                question_id: id,
                value: value.to_string(),
            },
        );
        assert_eq!(outcome, Outcome::Applied);
    }
    dispatch(&mut state, SessionEvent::GoTo(5));
    let outcome = dispatch(&mut state, SessionEvent::Submit);

    // Assert
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(state.session.phase(), Phase::Submitted);
    assert_eq!(
        state.session.progress(),
        Progress {
            answered: 5,
            total: 6
        }
    );
    assert_eq!(state.session.progress().fraction(), 5.0 / 6.0);

    let payload = state.submission().expect("payload");
    assert_eq!(payload.answered_count, 5);
    assert_eq!(payload.total_count, 6);
    assert!(!payload.answers.contains_key(&6));
    assert_eq!(payload.trigger, SubmitTrigger::Manual);
    assert_eq!(payload.time_remaining_at_submission, 7200);
}

#[test]
fn scenario_c_integrity_alerts_count_and_freeze() {
    // Arrange
    let (mut h, mut rx) = started_with_notices(7200);

    // Act
    for _ in 0..3 {
        assert!(h.visibility.lose_focus());
    }
    h.controller.pump();
    h.controller.handle(SessionEvent::GoTo(5));
    h.controller.handle(SessionEvent::Submit);

    // A fourth loss after submission goes nowhere
    assert!(!h.visibility.lose_focus());
    h.controller.handle(SessionEvent::FocusLost);

    // Assert
    assert_eq!(h.controller.session().warning_count(), 3);

    let mut alert_counts = Vec::new();
    let mut payload_warnings = None;
    for notice in drain(&mut rx) {
        match notice {
            SessionNotice::IntegrityAlert(alert) => alert_counts.push(alert.warning_count),
            SessionNotice::Submitted(payload) => payload_warnings = Some(payload.warning_count),
            _ => {}
        }
    }
    assert_eq!(alert_counts, vec![1, 2, 3]);
    assert_eq!(payload_warnings, Some(3));
}

#[test]
fn scenario_d_answer_outside_options_is_rejected() {
    // Arrange
    let mut state = state_with_duration(7200);

    // Act
    let outcome = dispatch(
        &mut state,
        SessionEvent::SetAnswer {
            question_id: 2,
            value: "22".to_string(),
        },
    );

    // Assert
    assert_eq!(outcome, Outcome::Ignored(IgnoreReason::InvalidOption));
    assert_eq!(state.session.answer(2), None);
    assert_eq!(state.session.progress().answered, 0);
    assert!(!state.session.tiles()[1].answered);
}

#[test]
fn scenario_e_flag_toggle_pair_is_identity() {
    // Arrange
    let mut state = state_with_duration(7200);
    assert!(state.session.flagged().is_empty());

    // Act
    dispatch(&mut state, SessionEvent::ToggleFlag(2));
    assert!(state.session.is_flagged(2));
    dispatch(&mut state, SessionEvent::ToggleFlag(2));

    // Assert
    assert!(state.session.flagged().is_empty());
}

#[test]
fn empty_free_text_is_answered_but_absent_is_not() {
    let mut state = state_with_duration(7200);

    dispatch(
        &mut state,
        SessionEvent::SetAnswer {
            question_id: 4,
            value: String::new(),
        },
    );

    assert_eq!(state.session.answer(4), Some(""));
    assert_eq!(state.session.answer(6), None);
    assert_eq!(state.session.progress().answered, 1);
}

#[test]
fn nothing_changes_after_submission() {
    let mut state = state_with_duration(7200);
    dispatch(
        &mut state,
        SessionEvent::SetAnswer {
            question_id: 1,
            value: "Paris".to_string(),
        },
    );
    dispatch(&mut state, SessionEvent::ToggleFlag(3));
    dispatch(&mut state, SessionEvent::FocusLost);
    dispatch(&mut state, SessionEvent::Tick);
    dispatch(&mut state, SessionEvent::GoTo(5));
    dispatch(&mut state, SessionEvent::Submit);

    let answers = state.session.answers().clone();
    let flagged = state.session.flagged().clone();
    let warnings = state.session.warning_count();
    let remaining = state.session.remaining_seconds();
    let index = state.session.current_index();

    let late = vec![
        SessionEvent::SetAnswer {
            question_id: 6,
            value: "late".to_string(),
        },
        SessionEvent::AnswerCurrent("late".to_string()),
        SessionEvent::ChooseOption(1),
        SessionEvent::ToggleFlag(3),
        SessionEvent::ToggleFlagCurrent,
        SessionEvent::FocusLost,
        SessionEvent::FocusRegained,
        SessionEvent::Tick,
        SessionEvent::GoTo(0),
        SessionEvent::Previous,
        SessionEvent::Submit,
    ];
    for event in late {
        assert_eq!(
            dispatch(&mut state, event),
            Outcome::Ignored(IgnoreReason::Submitted)
        );
    }

    assert_eq!(state.session.answers(), &answers);
    assert_eq!(state.session.flagged(), &flagged);
    assert_eq!(state.session.warning_count(), warnings);
    assert_eq!(state.session.remaining_seconds(), remaining);
    assert_eq!(state.session.current_index(), index);
}

#[test]
fn manual_submit_and_expiry_in_same_instant_submit_once() {
    // Arrange: one second left, candidate on the last question
    let mut h = started(1);
    h.controller.handle(SessionEvent::GoTo(5));

    // Act: the final tick and the submit click land back to back
    h.clock.tick();
    h.controller.sender().send(SessionEvent::Submit).unwrap();
    h.controller.pump();

    // Assert
    let payload = h.controller.state().submission().expect("payload");
    assert_eq!(payload.trigger, SubmitTrigger::TimerExpired);
    assert_eq!(
        h.controller.handle(SessionEvent::Submit),
        Outcome::Ignored(IgnoreReason::Submitted)
    );
}

#[test]
fn navigation_reaches_answered_unanswered_and_flagged_questions() {
    let mut state = state_with_duration(7200);
    dispatch(
        &mut state,
        SessionEvent::SetAnswer {
            question_id: 3,
            value: "Mars".to_string(),
        },
    );
    dispatch(&mut state, SessionEvent::ToggleFlag(5));

    for index in [2, 4, 0, 5] {
        assert!(dispatch(&mut state, SessionEvent::GoTo(index)).is_applied());
        assert_eq!(state.session.current_index(), index);
    }
    assert_eq!(
        dispatch(&mut state, SessionEvent::GoTo(6)),
        Outcome::Ignored(IgnoreReason::OutOfRange)
    );
    assert_eq!(state.session.current_index(), 5);
}
