use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Question, QuestionId, SessionSettings, TimerMode};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a session needs at least one question")]
    EmptyQuestionList,

    #[error("question id {0} appears more than once")]
    DuplicateQuestionId(QuestionId),
}

/// Lifecycle of a session. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    /// Completion requested; the timer is being stopped before anyone is told.
    Completing,
    Completed,
}

/// Ordered questions plus the cursor into them.
///
/// Navigation only moves the cursor within bounds; enforcing `Active` is the
/// controller's job.
#[derive(Debug, Clone)]
pub struct SessionState {
    questions: Vec<Question>,
    current: usize,
    status: SessionStatus,
    settings: SessionSettings,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Creates an `Active` session positioned at the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuestionList` for zero questions and
    /// `SessionError::DuplicateQuestionId` when two questions share an id.
    pub fn new(
        questions: Vec<Question>,
        settings: SessionSettings,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionList);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(SessionError::DuplicateQuestionId(question.id().clone()));
            }
        }

        Ok(Self {
            questions,
            current: 0,
            status: SessionStatus::Active,
            settings,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; construction rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub fn timer_mode(&self) -> TimerMode {
        self.settings.timer_mode()
    }

    /// Countdown for the current question, honoring the configured default.
    #[must_use]
    pub fn current_limit_secs(&self) -> u32 {
        self.current_question()
            .limit_or(self.settings.default_question_secs())
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Move to the next question. Returns false at the last index.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move to the previous question. Returns false at index 0.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn begin_completion(&mut self) {
        self.status = SessionStatus::Completing;
    }

    pub fn finish_completion(&mut self, completed_at: DateTime<Utc>) {
        self.status = SessionStatus::Completed;
        self.completed_at = Some(completed_at);
    }
}
