//! Outbound collaborator contract used by the navigation controller.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use interview_core::model::{AnswerSnapshot, QuestionId};
use serde::Serialize;

/// Why a session reached `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The candidate asked to finish.
    Submitted,
    /// The global countdown ran out.
    TimeExpired,
    /// The final per-question countdown ran out under `LastQuestionExpiry::Complete`.
    LastQuestionExpired,
}

/// Payload handed to [`SessionPorts::complete`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionSummary {
    pub answers: AnswerSnapshot,
    pub reason: CompletionReason,
    pub final_index: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Hooks the controller calls out to. Both are fire-and-forget.
pub trait SessionPorts: Send + Sync {
    /// Called on every save: navigation, completion, and timer-driven transitions.
    fn save_answer(&self, question_id: &QuestionId, text: &str);

    /// Called exactly once, when the session becomes `Completed`.
    fn complete(&self, summary: &CompletionSummary);
}

impl<T: SessionPorts + ?Sized> SessionPorts for Arc<T> {
    fn save_answer(&self, question_id: &QuestionId, text: &str) {
        (**self).save_answer(question_id, text);
    }

    fn complete(&self, summary: &CompletionSummary) {
        (**self).complete(summary);
    }
}

/// Ports that do nothing, for callers that only read the final snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPorts;

impl SessionPorts for NoopPorts {
    fn save_answer(&self, _question_id: &QuestionId, _text: &str) {}

    fn complete(&self, _summary: &CompletionSummary) {}
}

/// In-memory ports that remember every call. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingPorts {
    saves: Arc<Mutex<Vec<(QuestionId, String)>>>,
    completions: Arc<Mutex<Vec<CompletionSummary>>>,
}

impl RecordingPorts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every save in call order.
    #[must_use]
    pub fn saves(&self) -> Vec<(QuestionId, String)> {
        self.saves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent text saved for `id`.
    #[must_use]
    pub fn last_saved(&self, id: &QuestionId) -> Option<String> {
        self.saves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(saved_id, _)| saved_id == id)
            .map(|(_, text)| text.clone())
    }

    #[must_use]
    pub fn completions(&self) -> Vec<CompletionSummary> {
        self.completions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionPorts for RecordingPorts {
    fn save_answer(&self, question_id: &QuestionId, text: &str) {
        self.saves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((question_id.clone(), text.to_owned()));
    }

    fn complete(&self, summary: &CompletionSummary) {
        self.completions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(summary.clone());
    }
}
