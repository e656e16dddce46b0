//! TOML interview definitions.
//!
//! ```toml
//! [settings]
//! timer_mode = "per_question"
//! default_question_secs = 90
//!
//! [[questions]]
//! id = "intro"
//! text = "Tell us about a project you are proud of."
//! time_limit_secs = 120
//! ```

use std::path::Path;

use interview_core::model::{
    Question, QuestionDraft, QuestionError, SessionSettings, SettingsError,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InterviewFileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse interview file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("question {index}: {source}")]
    Question {
        index: usize,
        source: QuestionError,
    },
}

#[derive(Debug, Deserialize)]
struct RawInterview {
    #[serde(default)]
    settings: SessionSettings,
    #[serde(default)]
    questions: Vec<QuestionDraft>,
}

/// A validated interview: timing settings plus the ordered questions.
#[derive(Debug, Clone)]
pub struct InterviewFile {
    pub settings: SessionSettings,
    pub questions: Vec<Question>,
}

impl InterviewFile {
    /// # Errors
    ///
    /// Returns `InterviewFileError` when the file is unreadable or invalid.
    pub fn load(path: &Path) -> Result<Self, InterviewFileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| InterviewFileError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// An empty question list parses fine; the session refuses it at start.
    ///
    /// # Errors
    ///
    /// Returns `InterviewFileError` for malformed TOML, invalid settings, or invalid questions.
    pub fn parse(contents: &str) -> Result<Self, InterviewFileError> {
        let raw: RawInterview = toml::from_str(contents)?;
        raw.settings.validate()?;

        let questions = raw
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate()
                    .map_err(|source| InterviewFileError::Question { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            settings: raw.settings,
            questions,
        })
    }
}
