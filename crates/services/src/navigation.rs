use std::fmt;

use interview_core::model::{
    AnswerStore, LastQuestionExpiry, Question, SessionSettings, SessionState, SessionStatus,
    TimerMode,
};
use interview_core::{Clock, TimerEngine, TimerEvent, TimerHandle};
use tracing::{debug, info, warn};

use crate::error::NavigationError;
use crate::ports::{CompletionReason, CompletionSummary, NoopPorts, SessionPorts};
use crate::progress::SessionProgress;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of a user-initiated navigation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: usize, to: usize },
    /// Answer saved, cursor already at the boundary.
    Stayed { index: usize },
    Completed,
    /// `complete()` on a session that was already completed.
    AlreadyCompleted,
}

/// Result of one elapsed second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No live countdown.
    Idle,
    Ticked { remaining_secs: u32, warning: bool },
    /// Per-question countdown ran out and the next question was entered.
    AutoAdvanced { from: usize, to: usize },
    /// Per-question countdown ran out on the final question; the session stays active.
    TimerExhausted { index: usize },
    Completed(CompletionReason),
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives a candidate through a fixed question sequence under one timing discipline.
///
/// Owns the only `TimerEngine` of the session. The engine is stopped on every
/// transition that leaves a question, on completion, and when the controller is dropped.
pub struct NavigationController<P: SessionPorts = NoopPorts> {
    state: SessionState,
    answers: AnswerStore,
    draft: String,
    timer: TimerEngine,
    ports: P,
    clock: Clock,
}

impl<P: SessionPorts> NavigationController<P> {
    /// Start an `Active` session at the first question with its countdown running.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Settings` for invalid settings and
    /// `NavigationError::Session` for an empty or duplicated question list.
    pub fn new(
        questions: Vec<Question>,
        settings: SessionSettings,
        ports: P,
        clock: Clock,
    ) -> Result<Self, NavigationError> {
        settings.validate()?;
        let state = SessionState::new(questions, settings, clock.now())?;

        let mut controller = Self {
            state,
            answers: AnswerStore::new(),
            draft: String::new(),
            timer: TimerEngine::new(),
            ports,
            clock,
        };

        let duration = match controller.state.timer_mode() {
            TimerMode::PerQuestion => controller.state.current_limit_secs(),
            TimerMode::Global => controller.state.settings().global_duration_secs(),
        };
        controller.arm_timer(duration);

        info!(
            questions = controller.state.len(),
            mode = ?controller.state.timer_mode(),
            duration_secs = duration,
            "interview session started"
        );
        Ok(controller)
    }

    // ─── Navigation ───────────────────────────────────────────────────────────

    /// Replace the in-progress answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` once the session is no longer active.
    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), NavigationError> {
        self.ensure_active("edit")?;
        self.draft = text.into();
        Ok(())
    }

    /// Save the current answer and move forward, unless already at the last question.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` once the session is no longer active.
    pub fn next(&mut self) -> Result<Transition, NavigationError> {
        self.ensure_active("advance")?;
        self.save_current();
        Ok(self.step(Direction::Forward))
    }

    /// Save the current answer and move back, unless already at the first question.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` once the session is no longer active.
    pub fn prev(&mut self) -> Result<Transition, NavigationError> {
        self.ensure_active("go back in")?;
        self.save_current();
        Ok(self.step(Direction::Backward))
    }

    /// Save the current answer, stop the timer, and report completion.
    ///
    /// Calling this again after completion is a no-op.
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` keeps the signature aligned with `next`/`prev`.
    pub fn complete(&mut self) -> Result<Transition, NavigationError> {
        if !self.state.is_active() {
            return Ok(Transition::AlreadyCompleted);
        }
        self.save_current();
        self.finish(CompletionReason::Submitted);
        Ok(Transition::Completed)
    }

    /// Advance the live countdown by one elapsed second and react to expiry.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_active() {
            return TickOutcome::Idle;
        }

        match self.timer.tick() {
            None => TickOutcome::Idle,
            Some(TimerEvent::Tick { remaining_secs }) => TickOutcome::Ticked {
                remaining_secs,
                warning: self.state.settings().warn_at_secs() == Some(remaining_secs),
            },
            Some(TimerEvent::Expired) => self.on_expired(),
        }
    }

    // ─── Queries ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        self.state.current_question()
    }

    /// In-progress answer for the current question.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.status() == SessionStatus::Completed
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.timer.remaining_secs()
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Handle of the live countdown; changes whenever the timer is restarted.
    #[must_use]
    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.timer.handle()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let answered = self
            .state
            .questions()
            .iter()
            .filter(|question| !self.answers.get(question.id()).trim().is_empty())
            .count();

        SessionProgress {
            total: self.state.len(),
            current_index: self.state.current_index(),
            answered,
            remaining_secs: self.timer.remaining_secs(),
            timer_mode: self.state.timer_mode(),
            status: self.state.status(),
        }
    }

    // ─── Internals ────────────────────────────────────────────────────────────

    fn ensure_active(&self, operation: &'static str) -> Result<(), NavigationError> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(NavigationError::InvalidTransition { operation })
        }
    }

    fn save_current(&mut self) {
        let id = self.state.current_question().id().clone();
        self.ports.save_answer(&id, &self.draft);
        self.answers.set(id, self.draft.clone());
    }

    fn step(&mut self, direction: Direction) -> Transition {
        let from = self.state.current_index();
        let moved = match direction {
            Direction::Forward => self.state.advance(),
            Direction::Backward => self.state.retreat(),
        };
        if !moved {
            debug!(index = from, ?direction, "navigation at boundary; answer saved");
            return Transition::Stayed { index: from };
        }

        self.enter_current();
        let to = self.state.current_index();
        debug!(from, to, "navigated");
        Transition::Moved { from, to }
    }

    /// Preload the stored answer and, per question, restart the countdown.
    fn enter_current(&mut self) {
        self.draft = self
            .answers
            .get(self.state.current_question().id())
            .to_owned();

        if self.state.timer_mode() == TimerMode::PerQuestion {
            let limit = self.state.current_limit_secs();
            self.arm_timer(limit);
        }
    }

    fn arm_timer(&mut self, duration_secs: u32) {
        match self.timer.reset(duration_secs) {
            Ok(handle) => {
                debug!(generation = handle.generation(), duration_secs, "timer armed");
            }
            Err(err) => {
                // Validated settings never get here; the next tick reports nothing.
                warn!(%err, duration_secs, "countdown treated as already expired");
            }
        }
    }

    fn on_expired(&mut self) -> TickOutcome {
        self.save_current();

        match self.state.timer_mode() {
            TimerMode::Global => {
                self.finish(CompletionReason::TimeExpired);
                TickOutcome::Completed(CompletionReason::TimeExpired)
            }
            TimerMode::PerQuestion if self.state.is_last() => {
                let index = self.state.current_index();
                match self.state.settings().last_question_expiry() {
                    LastQuestionExpiry::Hold => {
                        warn!(index, "final question timer exhausted; session left open");
                        TickOutcome::TimerExhausted { index }
                    }
                    LastQuestionExpiry::Complete => {
                        self.finish(CompletionReason::LastQuestionExpired);
                        TickOutcome::Completed(CompletionReason::LastQuestionExpired)
                    }
                }
            }
            TimerMode::PerQuestion => match self.step(Direction::Forward) {
                Transition::Moved { from, to } => TickOutcome::AutoAdvanced { from, to },
                _ => TickOutcome::Idle,
            },
        }
    }

    fn finish(&mut self, reason: CompletionReason) {
        self.state.begin_completion();
        self.timer.stop();

        let completed_at = self.clock.now();
        self.state.finish_completion(completed_at);

        let summary = CompletionSummary {
            answers: self.answers.snapshot(),
            reason,
            final_index: self.state.current_index(),
            started_at: self.state.started_at(),
            completed_at,
        };
        info!(
            ?reason,
            answers = summary.answers.len(),
            final_index = summary.final_index,
            "interview session completed"
        );
        self.ports.complete(&summary);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl<P: SessionPorts> Drop for NavigationController<P> {
    fn drop(&mut self) {
        if self.timer.is_running() {
            debug!("session dropped with a live timer; stopping it");
        }
        self.timer.stop();
    }
}

impl<P: SessionPorts> fmt::Debug for NavigationController<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationController")
            .field("questions_len", &self.state.len())
            .field("current", &self.state.current_index())
            .field("status", &self.state.status())
            .field("mode", &self.state.timer_mode())
            .field("remaining_secs", &self.timer.remaining_secs())
            .field("answers_len", &self.answers.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
