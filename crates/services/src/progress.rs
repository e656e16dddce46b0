use interview_core::model::{SessionStatus, TimerMode};

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub current_index: usize,
    /// Questions whose saved answer is not blank.
    pub answered: usize,
    pub remaining_secs: Option<u32>,
    pub timer_mode: TimerMode,
    pub status: SessionStatus,
}

impl SessionProgress {
    /// One-based position for display.
    #[must_use]
    pub fn position(&self) -> usize {
        self.current_index + 1
    }
}

/// Render seconds as `m:ss`.
#[must_use]
pub fn format_remaining(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes}:{remainder:02}")
}
