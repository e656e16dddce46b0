//! One-second-resolution countdown.
//!
//! The engine owns no clock and spawns nothing: whoever owns it calls [`TimerEngine::tick`]
//! once per elapsed second and reacts to the returned [`TimerEvent`]. Events are the
//! engine's notifications, so a stopped engine simply has nothing left to report.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimerError {
    /// The countdown was started with zero seconds and is already expired.
    #[error("timer duration must be > 0")]
    InvalidDuration,
}

/// Notification produced by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed and time remains.
    Tick { remaining_secs: u32 },
    /// The countdown reached zero. Reported at most once per handle.
    Expired,
}

/// Identifies one countdown run. Every `start`/`reset` produces a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Idle,
    Running { remaining_secs: u32 },
    Expired,
}

/// Cancellable, restartable countdown with single-fire expiry.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    state: TimerState,
    duration_secs: u32,
    generation: u64,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            duration_secs: 0,
            generation: 0,
        }
    }

    /// Begin counting down from `duration_secs`, cancelling any live countdown first.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidDuration` for zero seconds. The engine is then already
    /// expired and no ticks follow; callers treat the error as the expiry notification.
    pub fn start(&mut self, duration_secs: u32) -> Result<TimerHandle, TimerError> {
        self.stop();
        self.generation += 1;
        self.duration_secs = duration_secs;

        if duration_secs == 0 {
            self.state = TimerState::Expired;
            return Err(TimerError::InvalidDuration);
        }

        self.state = TimerState::Running {
            remaining_secs: duration_secs,
        };
        Ok(TimerHandle(self.generation))
    }

    /// Cancel the live countdown. Idempotent; after it returns `tick` reports nothing
    /// until the next `start`.
    pub fn stop(&mut self) {
        self.state = TimerState::Idle;
    }

    /// `stop` followed by `start`.
    ///
    /// # Errors
    ///
    /// Same as [`TimerEngine::start`].
    pub fn reset(&mut self, duration_secs: u32) -> Result<TimerHandle, TimerError> {
        self.stop();
        self.start(duration_secs)
    }

    /// Advance by one elapsed second.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        let TimerState::Running { remaining_secs } = self.state else {
            return None;
        };

        let remaining_secs = remaining_secs.saturating_sub(1);
        if remaining_secs == 0 {
            self.state = TimerState::Expired;
            Some(TimerEvent::Expired)
        } else {
            self.state = TimerState::Running { remaining_secs };
            Some(TimerEvent::Tick { remaining_secs })
        }
    }

    /// Seconds left: `None` when idle, `Some(0)` once expired.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        match self.state {
            TimerState::Idle => None,
            TimerState::Running { remaining_secs } => Some(remaining_secs),
            TimerState::Expired => Some(0),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    /// Handle of the current run, if it has not been stopped.
    #[must_use]
    pub fn handle(&self) -> Option<TimerHandle> {
        match self.state {
            TimerState::Idle => None,
            TimerState::Running { .. } | TimerState::Expired => Some(TimerHandle(self.generation)),
        }
    }

    /// Duration the current (or last) run was started with.
    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timer: &mut TimerEngine, ticks: usize) -> Vec<TimerEvent> {
        (0..ticks).filter_map(|_| timer.tick()).collect()
    }

    #[test]
    fn counts_down_then_expires_once() {
        let mut timer = TimerEngine::new();
        timer.start(3).unwrap();

        let events = drain(&mut timer, 6);
        assert_eq!(
            events,
            vec![
                TimerEvent::Tick { remaining_secs: 2 },
                TimerEvent::Tick { remaining_secs: 1 },
                TimerEvent::Expired,
            ]
        );
        assert!(timer.is_expired());
        assert_eq!(timer.remaining_secs(), Some(0));
    }

    #[test]
    fn zero_duration_is_immediate_expiry() {
        let mut timer = TimerEngine::new();
        let err = timer.start(0).unwrap_err();
        assert_eq!(err, TimerError::InvalidDuration);
        assert!(timer.is_expired());
        assert_eq!(timer.tick(), None);
    }

    #[test]
    fn stop_is_idempotent_and_silences_ticks() {
        let mut timer = TimerEngine::new();
        timer.stop();
        timer.start(5).unwrap();
        timer.stop();
        timer.stop();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), None);
        assert!(timer.handle().is_none());
    }

    #[test]
    fn reset_restarts_from_full_duration() {
        let mut timer = TimerEngine::new();
        let first = timer.start(5).unwrap();
        drain(&mut timer, 3);
        assert_eq!(timer.remaining_secs(), Some(2));

        let second = timer.reset(5).unwrap();
        assert_ne!(first, second);
        assert_eq!(timer.remaining_secs(), Some(5));
        assert_eq!(timer.tick(), Some(TimerEvent::Tick { remaining_secs: 4 }));
    }

    #[test]
    fn reset_after_expiry_rearms() {
        let mut timer = TimerEngine::new();
        timer.start(1).unwrap();
        assert_eq!(timer.tick(), Some(TimerEvent::Expired));
        timer.reset(2).unwrap();
        assert!(timer.is_running());
        assert_eq!(drain(&mut timer, 2).last(), Some(&TimerEvent::Expired));
    }
}
