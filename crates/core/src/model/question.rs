use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question time limit must be > 0")]
    InvalidTimeLimit,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single interview question. Immutable once a session holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    time_limit_secs: Option<u32>,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyId` or `QuestionError::EmptyText` for blank fields,
    /// and `QuestionError::InvalidTimeLimit` when a time limit of zero is given.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        time_limit_secs: Option<u32>,
    ) -> Result<Self, QuestionError> {
        if id.as_str().trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if time_limit_secs == Some(0) {
            return Err(QuestionError::InvalidTimeLimit);
        }

        Ok(Self {
            id,
            text,
            time_limit_secs,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> Option<u32> {
        self.time_limit_secs
    }

    /// Countdown length for this question, falling back to the configured default.
    #[must_use]
    pub fn limit_or(&self, default_secs: u32) -> u32 {
        self.time_limit_secs.unwrap_or(default_secs)
    }
}

/// Unvalidated question as it arrives from job configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub text: String,
    #[serde(default)]
    pub time_limit_secs: Option<u32>,
}

impl QuestionDraft {
    /// # Errors
    ///
    /// Returns `QuestionError` when the draft fails validation.
    pub fn validate(self) -> Result<Question, QuestionError> {
        Question::new(self.id, self.text, self.time_limit_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_time_limit() {
        let err = Question::new(QuestionId::new("q1"), "Why Rust?", Some(0)).unwrap_err();
        assert_eq!(err, QuestionError::InvalidTimeLimit);
    }

    #[test]
    fn rejects_blank_text() {
        let err = Question::new(QuestionId::new("q1"), "   ", None).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn limit_falls_back_to_default() {
        let own = Question::new(QuestionId::new("a"), "A", Some(45)).unwrap();
        let fallback = Question::new(QuestionId::new("b"), "B", None).unwrap();
        assert_eq!(own.limit_or(120), 45);
        assert_eq!(fallback.limit_or(120), 120);
    }

    #[test]
    fn draft_deserializes_from_toml() {
        let draft: QuestionDraft = toml::from_str(
            r#"
            id = "intro"
            text = "Tell us about yourself"
            time_limit_secs = 90
            "#,
        )
        .unwrap();
        let question = draft.validate().unwrap();
        assert_eq!(question.id().as_str(), "intro");
        assert_eq!(question.time_limit_secs(), Some(90));
    }
}
