// src/main.rs

use std::io::BufRead;
use std::time::Duration;

use dotenvy::dotenv;
use exam_session::{
    SessionController,
    config::Config,
    error::AppError,
    models::{
        event::{SessionEvent, SessionNotice, SessionSnapshot},
        question::{ExamPaper, QuestionKind},
    },
    sources::{EventSender, IntervalClock, ManualVisibility},
    state::SessionState,
    utils::{
        sink::{JsonFileSink, StdoutSink, SubmissionSink},
        time::format_clock,
    },
};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
commands:
  next | prev | goto N      move between questions
  choose N                  pick option N of a multiple-choice question
  answer TEXT               answer the current question
  flag                      flag / unflag the current question
  blur | focus              simulate leaving / returning to the exam view
  status                    show the current question
  submit                    submit (from the last question)
  quit                      abandon the session without submitting";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load .env file (if present)
    dotenv().ok();

    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "exam-session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    let paper = ExamPaper::from_path(&config.exam_paper_path).inspect_err(|e| {
        tracing::error!("Failed to load exam paper: {}", e);
    })?;
    let state = SessionState::from_config(paper, &config)?;

    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();
    let mut controller = SessionController::new(state).with_notices(notice_tx);

    let clock = IntervalClock::new(Duration::from_millis(config.tick_interval_ms));
    let visibility = ManualVisibility::default();
    controller.start(&clock, &visibility);

    let session = controller.session();
    println!("{}", session.title());
    if let Some(subtitle) = session.subtitle() {
        println!("{}", subtitle);
    }
    println!(
        "{} questions, {} marks, {} on the clock. Type 'help' for commands.",
        session.question_count(),
        session.questions().total_marks(),
        format_clock(session.remaining_seconds())
    );

    let events = controller.sender();
    events.send(SessionEvent::Describe).ok();
    spawn_input_thread(events, visibility);

    let printer = tokio::spawn(async move {
        while let Some(notice) = notice_rx.recv().await {
            render(&notice);
        }
    });

    let payload = controller.run().await;
    // Dropping the controller closes the notice channel and ends the printer.
    drop(controller);
    printer.await.ok();

    let Some(payload) = payload else {
        tracing::info!("Session ended without a submission");
        return Ok(());
    };

    println!("Submitted. {}", payload.summary());
    let sink: Box<dyn SubmissionSink> = match &config.submission_output {
        Some(path) => Box::new(JsonFileSink::new(path.clone())),
        None => Box::new(StdoutSink),
    };
    sink.deliver(&payload).await?;

    Ok(())
}

/// What a line of terminal input asks for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Event(SessionEvent),
    Blur,
    Focus,
    Help,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "next" | "n" => Command::Event(SessionEvent::Next),
        "prev" | "p" => Command::Event(SessionEvent::Previous),
        "goto" | "g" => {
            let number: usize = rest.parse().ok()?;
            Command::Event(SessionEvent::GoTo(number.checked_sub(1)?))
        }
        "choose" | "c" => Command::Event(SessionEvent::ChooseOption(rest.parse().ok()?)),
        "answer" | "a" => Command::Event(SessionEvent::AnswerCurrent(rest.to_string())),
        "flag" | "f" => Command::Event(SessionEvent::ToggleFlagCurrent),
        "status" | "s" => Command::Event(SessionEvent::Describe),
        "submit" => Command::Event(SessionEvent::Submit),
        "quit" | "q" => Command::Event(SessionEvent::Teardown),
        "blur" => Command::Blur,
        "focus" => Command::Focus,
        "help" | "h" | "?" => Command::Help,
        _ => return None,
    };
    Some(command)
}

/// Stdin is read on a plain thread so a pending read never holds up runtime shutdown.
fn spawn_input_thread(events: EventSender, visibility: ManualVisibility) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            let delivered = match parse_command(&line) {
                Some(Command::Event(event)) => {
                    let redraw = !matches!(
                        event,
                        SessionEvent::Describe | SessionEvent::Teardown | SessionEvent::Submit
                    );
                    events.send(event).is_ok()
                        && (!redraw || events.send(SessionEvent::Describe).is_ok())
                }
                Some(Command::Blur) => visibility.lose_focus(),
                Some(Command::Focus) => visibility.regain_focus(),
                Some(Command::Help) => {
                    println!("{}", HELP);
                    true
                }
                None => {
                    println!("unrecognised command: {} (try 'help')", line.trim());
                    true
                }
            };
            if !delivered {
                break;
            }
        }
    });
}

fn render(notice: &SessionNotice) {
    match notice {
        SessionNotice::TimerTick { remaining_seconds } => {
            if remaining_seconds % 60 == 0 {
                println!("[{}] remaining", format_clock(*remaining_seconds));
            }
        }
        SessionNotice::LowTime { remaining_seconds } => {
            println!("Less than {} left!", format_clock(*remaining_seconds + 1));
        }
        SessionNotice::IntegrityAlert(alert) => println!("{}", alert.message()),
        SessionNotice::Snapshot(snapshot) => render_snapshot(snapshot),
        SessionNotice::Submitted(_) => {}
    }
}

fn render_snapshot(snapshot: &SessionSnapshot) {
    let grid: Vec<String> = snapshot
        .tiles
        .iter()
        .map(|tile| {
            let mark = if tile.current {
                ">"
            } else if tile.answered {
                "*"
            } else {
                " "
            };
            let flag = if tile.flagged { "!" } else { "" };
            format!("{}{}{}", mark, tile.number, flag)
        })
        .collect();

    println!();
    println!(
        "{}  |  {}/{} answered ({:.0}%)  |  {}",
        snapshot.position_label,
        snapshot.progress.answered,
        snapshot.progress.total,
        snapshot.progress.percent(),
        snapshot.clock
    );
    println!("{}", grid.join(" "));
    println!(
        "[{:?}, {} marks]{} {}",
        snapshot.question.kind,
        snapshot.question.marks,
        if snapshot.flagged { " (flagged)" } else { "" },
        snapshot.question.prompt
    );
    if snapshot.question.kind == QuestionKind::MultipleChoice {
        for (idx, option) in snapshot.question.options.iter().enumerate() {
            let chosen = snapshot.current_answer.as_deref() == Some(option.as_str());
            println!("  {} {}. {}", if chosen { "(x)" } else { "( )" }, idx + 1, option);
        }
    } else if let Some(answer) = &snapshot.current_answer {
        println!("  your answer: {}", answer);
    }
    if snapshot.on_last_question {
        println!("This is the last question. Type 'submit' when you are done.");
    }
}
