mod interview_file;

use std::fmt;
use std::path::PathBuf;

use interview_core::model::{Question, QuestionId, TimerMode};
use services::{
    Clock, CompletionSummary, NavigationController, SessionEvent, SessionHandle, SessionPorts,
    SessionRuntime, Transition, format_remaining,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::interview_file::InterviewFile;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingFile,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingFile => write!(f, "no interview file given"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  interview run   [--file] <interview.toml>");
    eprintln!("  interview check [--file] <interview.toml>");
    eprintln!();
    eprintln!("While running, type an answer line to replace the current draft, or:");
    eprintln!("  :next  :prev  :done  :status");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  INTERVIEW_FILE, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

struct Args {
    file: PathBuf,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut file = std::env::var("INTERVIEW_FILE").ok().map(PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--file" | "-f" => file = Some(PathBuf::from(require_value(args, "--file")?)),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if arg.starts_with('-') => return Err(ArgsError::UnknownArg(arg)),
                _ => file = Some(PathBuf::from(arg)),
            }
        }

        file.map(|file| Self { file }).ok_or(ArgsError::MissingFile)
    }
}

/// Ports for a terminal run: saves go to the log, the final snapshot to stdout.
struct ConsolePorts;

impl SessionPorts for ConsolePorts {
    fn save_answer(&self, question_id: &QuestionId, text: &str) {
        debug!(%question_id, chars = text.chars().count(), "answer saved");
    }

    fn complete(&self, summary: &CompletionSummary) {
        println!();
        println!("Session finished ({:?}).", summary.reason);
        for (id, text) in summary.answers.iter() {
            let shown = if text.is_empty() { "<no answer>" } else { text };
            println!("  [{id}] {shown}");
        }
    }
}

fn print_question(questions: &[Question], index: usize) {
    if let Some(question) = questions.get(index) {
        println!();
        println!("Question {}/{}: {}", index + 1, questions.len(), question.text());
    }
}

fn should_print_tick(remaining_secs: u32) -> bool {
    remaining_secs <= 10 || remaining_secs % 30 == 0
}

/// Returns true once the session has completed.
fn report(event: SessionEvent, questions: &[Question]) -> bool {
    match event {
        SessionEvent::Tick { remaining_secs } => {
            if should_print_tick(remaining_secs) {
                println!("  time left {}", format_remaining(remaining_secs));
            }
        }
        SessionEvent::TimeWarning { remaining_secs } => {
            println!("  hurry up: {} left", format_remaining(remaining_secs));
        }
        SessionEvent::Navigated { to, .. } => print_question(questions, to),
        SessionEvent::AutoAdvanced { to, .. } => {
            println!("  time is up, moving on");
            print_question(questions, to);
        }
        SessionEvent::TimerExhausted { .. } => {
            println!("  time is up for the last question; type :done to submit");
        }
        SessionEvent::Completed { .. } => return true,
    }
    false
}

async fn handle_line(handle: &SessionHandle, line: &str) -> Result<(), Box<dyn std::error::Error>> {
    match line.trim() {
        ":next" | ":n" => {
            if let Transition::Stayed { .. } = handle.next().await? {
                println!("  already at the last question; type :done to submit");
            }
        }
        ":prev" | ":p" => {
            if let Transition::Stayed { .. } = handle.prev().await? {
                println!("  already at the first question");
            }
        }
        ":done" => {
            handle.complete().await?;
        }
        ":status" => {
            let progress = handle.progress().await?;
            let left = progress
                .remaining_secs
                .map_or_else(|| "-".to_string(), format_remaining);
            println!(
                "  question {}/{}, answered {}, time left {left}",
                progress.position(),
                progress.total,
                progress.answered
            );
        }
        _ => handle.set_draft(line).await?,
    }
    Ok(())
}

async fn run_session(file: InterviewFile) -> Result<(), Box<dyn std::error::Error>> {
    let questions = file.questions.clone();
    let mode = file.settings.timer_mode();
    let controller =
        NavigationController::new(file.questions, file.settings, ConsolePorts, Clock::system())?;
    let (handle, mut events) = SessionRuntime::spawn(controller);

    if mode == TimerMode::Global {
        let total = handle.progress().await?.remaining_secs.unwrap_or_default();
        println!("You have {} for the whole interview.", format_remaining(total));
    }
    print_question(&questions, 0);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if report(event, &questions) {
                    break;
                }
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => handle_line(&handle, &line).await?,
                    None => {
                        info!("stdin closed; submitting session");
                        handle.complete().await?;
                    }
                }
            }
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => match Command::from_arg(first) {
            Some(cmd) => {
                argv.remove(0);
                cmd
            }
            None => Command::Run,
        },
        None => Command::Run,
    };

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let file = InterviewFile::load(&parsed.file)?;

    match cmd {
        Command::Check => {
            println!(
                "{}: {} question(s), {:?} timing",
                parsed.file.display(),
                file.questions.len(),
                file.settings.timer_mode()
            );
            Ok(())
        }
        Command::Run => run_session(file).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
