use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("default question duration must be > 0")]
    InvalidDefaultDuration,

    #[error("global session duration must be > 0")]
    InvalidGlobalDuration,

    #[error("time warning threshold must be > 0")]
    InvalidWarningThreshold,
}

//
// ─── MODES ─────────────────────────────────────────────────────────────────────
//

/// Timing discipline for a session. Fixed at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// Each question has its own countdown that restarts on entry.
    #[default]
    PerQuestion,
    /// One countdown spans the whole session.
    Global,
}

/// What happens when a per-question countdown runs out on the final question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastQuestionExpiry {
    /// Stay on the final question with an exhausted timer.
    #[default]
    Hold,
    /// Complete the session.
    Complete,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Timing configuration supplied once by the job configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    timer_mode: TimerMode,
    default_question_secs: u32,
    global_duration_secs: u32,
    last_question_expiry: LastQuestionExpiry,
    warn_at_secs: Option<u32>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timer_mode: TimerMode::PerQuestion,
            default_question_secs: 120,
            global_duration_secs: 1_800,
            last_question_expiry: LastQuestionExpiry::Hold,
            warn_at_secs: None,
        }
    }
}

impl SessionSettings {
    /// Creates validated settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a duration or the warning threshold is zero.
    pub fn new(
        timer_mode: TimerMode,
        default_question_secs: u32,
        global_duration_secs: u32,
        last_question_expiry: LastQuestionExpiry,
        warn_at_secs: Option<u32>,
    ) -> Result<Self, SettingsError> {
        let settings = Self {
            timer_mode,
            default_question_secs,
            global_duration_secs,
            last_question_expiry,
            warn_at_secs,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Per-question settings with a default limit; everything else at defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidDefaultDuration` if `default_question_secs` is zero.
    pub fn per_question(default_question_secs: u32) -> Result<Self, SettingsError> {
        Self::new(
            TimerMode::PerQuestion,
            default_question_secs,
            Self::default().global_duration_secs,
            LastQuestionExpiry::Hold,
            None,
        )
    }

    /// Global-countdown settings; everything else at defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidGlobalDuration` if `global_duration_secs` is zero.
    pub fn global(global_duration_secs: u32) -> Result<Self, SettingsError> {
        Self::new(
            TimerMode::Global,
            Self::default().default_question_secs,
            global_duration_secs,
            LastQuestionExpiry::Hold,
            None,
        )
    }

    #[must_use]
    pub fn with_last_question_expiry(mut self, policy: LastQuestionExpiry) -> Self {
        self.last_question_expiry = policy;
        self
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidWarningThreshold` for a zero threshold.
    pub fn with_warn_at_secs(mut self, warn_at_secs: Option<u32>) -> Result<Self, SettingsError> {
        self.warn_at_secs = warn_at_secs;
        self.validate()?;
        Ok(self)
    }

    /// Checks invariants, useful after deserializing.
    ///
    /// # Errors
    ///
    /// Returns the first violated `SettingsError`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.default_question_secs == 0 {
            return Err(SettingsError::InvalidDefaultDuration);
        }
        if self.global_duration_secs == 0 {
            return Err(SettingsError::InvalidGlobalDuration);
        }
        if self.warn_at_secs == Some(0) {
            return Err(SettingsError::InvalidWarningThreshold);
        }
        Ok(())
    }

    #[must_use]
    pub fn timer_mode(&self) -> TimerMode {
        self.timer_mode
    }

    #[must_use]
    pub fn default_question_secs(&self) -> u32 {
        self.default_question_secs
    }

    /// Only meaningful in `TimerMode::Global`.
    #[must_use]
    pub fn global_duration_secs(&self) -> u32 {
        self.global_duration_secs
    }

    #[must_use]
    pub fn last_question_expiry(&self) -> LastQuestionExpiry {
        self.last_question_expiry
    }

    #[must_use]
    pub fn warn_at_secs(&self) -> Option<u32> {
        self.warn_at_secs
    }
}
