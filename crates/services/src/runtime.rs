//! Async driver for a `NavigationController`.
//!
//! One task owns the controller. User commands and one-second pulses both arrive
//! through that task, so navigation and expiry never interleave mid-operation.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, Interval};
use tracing::{debug, trace};

use crate::error::{NavigationError, RuntimeError};
use crate::navigation::{NavigationController, TickOutcome, Transition};
use crate::ports::{CompletionReason, SessionPorts};
use crate::progress::SessionProgress;

const PULSE: Duration = Duration::from_secs(1);
const COMMAND_BUFFER: usize = 32;

/// Notifications emitted by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Tick { remaining_secs: u32 },
    /// The countdown reached the configured reminder threshold.
    TimeWarning { remaining_secs: u32 },
    Navigated { from: usize, to: usize },
    AutoAdvanced { from: usize, to: usize },
    TimerExhausted { index: usize },
    Completed { reason: CompletionReason },
}

type Reply<T> = oneshot::Sender<Result<T, NavigationError>>;

enum Command {
    SetDraft(String, Reply<()>),
    Next(Reply<Transition>),
    Prev(Reply<Transition>),
    Complete(Reply<Transition>),
    Progress(oneshot::Sender<SessionProgress>),
}

/// Cloneable front door to a running session.
///
/// The session task stops once every handle is dropped; the controller (and its
/// timer) go with it.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` if the session task is gone, or the
    /// controller's `NavigationError`.
    pub async fn set_draft(&self, text: impl Into<String>) -> Result<(), RuntimeError> {
        let text = text.into();
        self.request(|reply| Command::SetDraft(text, reply)).await
    }

    /// # Errors
    ///
    /// See [`SessionHandle::set_draft`].
    pub async fn next(&self) -> Result<Transition, RuntimeError> {
        self.request(Command::Next).await
    }

    /// # Errors
    ///
    /// See [`SessionHandle::set_draft`].
    pub async fn prev(&self) -> Result<Transition, RuntimeError> {
        self.request(Command::Prev).await
    }

    /// # Errors
    ///
    /// See [`SessionHandle::set_draft`].
    pub async fn complete(&self) -> Result<Transition, RuntimeError> {
        self.request(Command::Complete).await
    }

    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` if the session task is gone.
    pub async fn progress(&self) -> Result<SessionProgress, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Progress(reply))
            .await
            .map_err(|_| RuntimeError::Closed)?;
        rx.await.map_err(|_| RuntimeError::Closed)
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| RuntimeError::Closed)?;
        let result = rx.await.map_err(|_| RuntimeError::Closed)?;
        Ok(result?)
    }
}

/// Spawns and runs session tasks.
pub struct SessionRuntime;

impl SessionRuntime {
    /// Move `controller` onto its own task and start pulsing its timer.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<P>(
        controller: NavigationController<P>,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<SessionEvent>)
    where
        P: SessionPorts + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(run(controller, command_rx, event_tx));

        (
            SessionHandle {
                commands: command_tx,
            },
            event_rx,
        )
    }
}

fn pulse() -> Interval {
    time::interval_at(Instant::now() + PULSE, PULSE)
}

async fn run<P: SessionPorts>(
    mut controller: NavigationController<P>,
    mut commands: mpsc::Receiver<Command>,
    events: mpsc::UnboundedSender<SessionEvent>,
) {
    let mut pulse = pulse();
    let mut armed = controller.timer_handle();

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                apply(&mut controller, command, &events);
            }
            _ = pulse.tick(), if controller.is_timer_running() => {
                let outcome = controller.tick();
                trace!(?outcome, "pulse");
                if let Some(event) = event_for_tick(outcome) {
                    let _ = events.send(event);
                }
            }
        }

        // A restarted countdown gets a full second before its first tick.
        let current = controller.timer_handle();
        if current != armed {
            pulse.reset();
            armed = current;
        }
    }

    debug!("all session handles dropped; stopping session task");
}

fn apply<P: SessionPorts>(
    controller: &mut NavigationController<P>,
    command: Command,
    events: &mpsc::UnboundedSender<SessionEvent>,
) {
    match command {
        Command::SetDraft(text, reply) => {
            let _ = reply.send(controller.set_draft(text));
        }
        Command::Next(reply) => {
            let result = controller.next();
            notify_transition(&result, events);
            let _ = reply.send(result);
        }
        Command::Prev(reply) => {
            let result = controller.prev();
            notify_transition(&result, events);
            let _ = reply.send(result);
        }
        Command::Complete(reply) => {
            let result = controller.complete();
            notify_transition(&result, events);
            let _ = reply.send(result);
        }
        Command::Progress(reply) => {
            let _ = reply.send(controller.progress());
        }
    }
}

fn notify_transition(
    result: &Result<Transition, NavigationError>,
    events: &mpsc::UnboundedSender<SessionEvent>,
) {
    let event = match result {
        Ok(Transition::Moved { from, to }) => SessionEvent::Navigated {
            from: *from,
            to: *to,
        },
        Ok(Transition::Completed) => SessionEvent::Completed {
            reason: CompletionReason::Submitted,
        },
        _ => return,
    };
    let _ = events.send(event);
}

fn event_for_tick(outcome: TickOutcome) -> Option<SessionEvent> {
    match outcome {
        TickOutcome::Idle => None,
        TickOutcome::Ticked {
            remaining_secs,
            warning: false,
        } => Some(SessionEvent::Tick { remaining_secs }),
        TickOutcome::Ticked {
            remaining_secs,
            warning: true,
        } => Some(SessionEvent::TimeWarning { remaining_secs }),
        TickOutcome::AutoAdvanced { from, to } => Some(SessionEvent::AutoAdvanced { from, to }),
        TickOutcome::TimerExhausted { index } => Some(SessionEvent::TimerExhausted { index }),
        TickOutcome::Completed(reason) => Some(SessionEvent::Completed { reason }),
    }
}
