// tests/common/mod.rs

#![allow(dead_code)]

use exam_session::{
    SessionController,
    models::{
        event::SessionNotice,
        question::{ExamPaper, Question, QuestionKind},
        session::Session,
    },
    sources::{ManualClock, ManualVisibility},
    state::{SessionPolicy, SessionState},
};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Six questions: ids 1, 2, 3, 5 are multiple choice, 4 is short, 6 is long.
pub fn six_question_paper() -> ExamPaper {
    let mcq = |id: i64, prompt: &str, options: &[&str]| Question {
        id,
        kind: QuestionKind::MultipleChoice,
        prompt: prompt.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        marks: 2,
    };
    let text = |id: i64, kind: QuestionKind, marks: u32| Question {
        id,
        kind,
        prompt: format!("Free response {}", id),
        options: Vec::new(),
        marks,
    };

    ExamPaper {
        title: "Integration paper".to_string(),
        subtitle: Some("Six questions".to_string()),
        duration_seconds: Some(7200),
        questions: vec![
            mcq(1, "Capital of France?", &["Paris", "Lyon", "Nice"]),
            mcq(2, "2 + 2?", &["3", "4", "5"]),
            mcq(3, "Largest planet?", &["Mars", "Jupiter", "Venus"]),
            text(4, QuestionKind::ShortAnswer, 4),
            mcq(5, "Water boils at (sea level, C)?", &["90", "100", "110"]),
            text(6, QuestionKind::LongAnswer, 8),
        ],
    }
}

pub fn state_with_duration(seconds: u32) -> SessionState {
    let session = Session::new(six_question_paper(), seconds).expect("valid paper");
    SessionState::new(session, SessionPolicy::default())
}

pub struct Harness {
    pub controller: SessionController,
    pub clock: ManualClock,
    pub visibility: ManualVisibility,
}

/// A started controller driven by manual sources.
pub fn started(seconds: u32) -> Harness {
    start(SessionController::new(state_with_duration(seconds)))
}

/// Same, forwarding notices to the returned receiver.
pub fn started_with_notices(seconds: u32) -> (Harness, UnboundedReceiver<SessionNotice>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let harness = start(SessionController::new(state_with_duration(seconds)).with_notices(tx));
    (harness, rx)
}

fn start(mut controller: SessionController) -> Harness {
    let clock = ManualClock::default();
    let visibility = ManualVisibility::default();
    controller.start(&clock, &visibility);
    Harness {
        controller,
        clock,
        visibility,
    }
}

/// Everything currently waiting on the notice channel.
pub fn drain(rx: &mut UnboundedReceiver<SessionNotice>) -> Vec<SessionNotice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}
