use thiserror::Error;

use crate::model::{QuestionError, SessionError, SettingsError};
use crate::timer::TimerError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Timer(#[from] TimerError),
}
