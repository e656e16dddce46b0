//! Shared error types for the services crate.

use thiserror::Error;

use interview_core::model::{QuestionError, SessionError, SettingsError};

/// Errors emitted by `NavigationController`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("cannot {operation} a session that is no longer active")]
    InvalidTransition { operation: &'static str },
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// Errors emitted by `SessionHandle`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RuntimeError {
    #[error("session runtime has shut down")]
    Closed,
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}
