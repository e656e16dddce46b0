use std::time::Duration;

use interview_core::model::{Question, QuestionId, SessionSettings};
use interview_core::time::fixed_clock;
use services::{
    CompletionReason, NavigationController, NavigationError, RecordingPorts, RuntimeError,
    SessionEvent, SessionRuntime, Transition,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Instant, sleep};

fn questions(limits: &[Option<u32>]) -> Vec<Question> {
    limits
        .iter()
        .enumerate()
        .map(|(i, limit)| {
            Question::new(QuestionId::from(i as u64), format!("Q{i}"), *limit).unwrap()
        })
        .collect()
}

async fn next_event(events: &mut UnboundedReceiver<SessionEvent>) -> SessionEvent {
    events.recv().await.expect("session task alive")
}

async fn wait_for_completion(events: &mut UnboundedReceiver<SessionEvent>) -> CompletionReason {
    loop {
        if let SessionEvent::Completed { reason } = next_event(events).await {
            return reason;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn per_question_timers_auto_advance_and_hold_on_last() {
    let ports = RecordingPorts::new();
    let controller = NavigationController::new(
        questions(&[Some(2), Some(2), Some(2)]),
        SessionSettings::per_question(60).unwrap(),
        ports.clone(),
        fixed_clock(),
    )
    .unwrap();
    let start = Instant::now();
    let (handle, mut events) = SessionRuntime::spawn(controller);

    let mut seen = Vec::new();
    for _ in 0..6 {
        seen.push(next_event(&mut events).await);
    }
    assert_eq!(
        seen,
        vec![
            SessionEvent::Tick { remaining_secs: 1 },
            SessionEvent::AutoAdvanced { from: 0, to: 1 },
            SessionEvent::Tick { remaining_secs: 1 },
            SessionEvent::AutoAdvanced { from: 1, to: 2 },
            SessionEvent::Tick { remaining_secs: 1 },
            SessionEvent::TimerExhausted { index: 2 },
        ]
    );
    assert_eq!(start.elapsed(), Duration::from_secs(6));

    let progress = handle.progress().await.unwrap();
    assert_eq!(progress.current_index, 2);
    assert_eq!(progress.remaining_secs, Some(0));
    assert!(ports.completions().is_empty());

    let saved = ports.saves();
    assert_eq!(saved.len(), 3);
    assert!(saved.iter().all(|(_, text)| text.is_empty()));
}

#[tokio::test(start_paused = true)]
async fn manual_navigation_gives_new_question_a_full_second() {
    let controller = NavigationController::new(
        questions(&[Some(3), Some(3)]),
        SessionSettings::per_question(60).unwrap(),
        RecordingPorts::new(),
        fixed_clock(),
    )
    .unwrap();
    let start = Instant::now();
    let (handle, mut events) = SessionRuntime::spawn(controller);

    sleep(Duration::from_millis(1_500)).await;
    assert_eq!(handle.next().await.unwrap(), Transition::Moved { from: 0, to: 1 });

    assert_eq!(next_event(&mut events).await, SessionEvent::Tick { remaining_secs: 2 });
    assert_eq!(next_event(&mut events).await, SessionEvent::Navigated { from: 0, to: 1 });
    assert_eq!(next_event(&mut events).await, SessionEvent::Tick { remaining_secs: 2 });
    assert_eq!(start.elapsed(), Duration::from_millis(2_500));
    assert_eq!(next_event(&mut events).await, SessionEvent::Tick { remaining_secs: 1 });
    assert_eq!(next_event(&mut events).await, SessionEvent::TimerExhausted { index: 1 });
    assert_eq!(start.elapsed(), Duration::from_millis(4_500));
}

#[tokio::test(start_paused = true)]
async fn global_countdown_forces_completion_with_saved_answers() {
    let ports = RecordingPorts::new();
    let controller = NavigationController::new(
        questions(&[None, None, None]),
        SessionSettings::global(10).unwrap(),
        ports.clone(),
        fixed_clock(),
    )
    .unwrap();
    let start = Instant::now();
    let (handle, mut events) = SessionRuntime::spawn(controller);

    handle.set_draft("zero").await.unwrap();
    sleep(Duration::from_millis(2_100)).await;
    handle.next().await.unwrap();
    handle.set_draft("one").await.unwrap();
    sleep(Duration::from_secs(2)).await;
    handle.next().await.unwrap();
    sleep(Duration::from_secs(2)).await;
    assert_eq!(handle.next().await.unwrap(), Transition::Stayed { index: 2 });
    handle.set_draft("two, in progress").await.unwrap();

    let reason = wait_for_completion(&mut events).await;
    assert_eq!(reason, CompletionReason::TimeExpired);
    assert_eq!(start.elapsed(), Duration::from_secs(10));

    let completions = ports.completions();
    assert_eq!(completions.len(), 1);
    let answers = &completions[0].answers;
    assert_eq!(answers.get(&QuestionId::from(0_u64)), Some("zero"));
    assert_eq!(answers.get(&QuestionId::from(1_u64)), Some("one"));
    assert_eq!(answers.get(&QuestionId::from(2_u64)), Some("two, in progress"));

    let err = handle.next().await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Navigation(NavigationError::InvalidTransition { .. })
    ));
    assert_eq!(handle.complete().await.unwrap(), Transition::AlreadyCompleted);
    assert_eq!(ports.completions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn warning_threshold_is_reported() {
    let settings = SessionSettings::per_question(3)
        .unwrap()
        .with_warn_at_secs(Some(1))
        .unwrap();
    let controller =
        NavigationController::new(questions(&[None]), settings, RecordingPorts::new(), fixed_clock())
            .unwrap();
    let (_handle, mut events) = SessionRuntime::spawn(controller);

    assert_eq!(next_event(&mut events).await, SessionEvent::Tick { remaining_secs: 2 });
    assert_eq!(next_event(&mut events).await, SessionEvent::TimeWarning { remaining_secs: 1 });
    assert_eq!(next_event(&mut events).await, SessionEvent::TimerExhausted { index: 0 });
}

#[tokio::test(start_paused = true)]
async fn submitting_emits_completion_once() {
    let ports = RecordingPorts::new();
    let controller = NavigationController::new(
        questions(&[None, None]),
        SessionSettings::per_question(30).unwrap(),
        ports.clone(),
        fixed_clock(),
    )
    .unwrap();
    let (handle, mut events) = SessionRuntime::spawn(controller);

    handle.set_draft("final words").await.unwrap();
    assert_eq!(handle.complete().await.unwrap(), Transition::Completed);
    assert_eq!(handle.complete().await.unwrap(), Transition::AlreadyCompleted);
    assert_eq!(wait_for_completion(&mut events).await, CompletionReason::Submitted);

    drop(handle);
    while let Some(event) = events.recv().await {
        assert!(!matches!(event, SessionEvent::Completed { .. }));
    }
    assert_eq!(ports.completions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_stops_the_session_task() {
    let ports = RecordingPorts::new();
    let controller = NavigationController::new(
        questions(&[None]),
        SessionSettings::per_question(30).unwrap(),
        ports.clone(),
        fixed_clock(),
    )
    .unwrap();
    let (handle, mut events) = SessionRuntime::spawn(controller);
    let second = handle.clone();

    drop(handle);
    assert!(second.progress().await.is_ok());
    drop(second);

    // Channel closes once the task has exited.
    while events.recv().await.is_some() {}
    assert!(ports.completions().is_empty());
}
