mod answers;
mod ids;
mod question;
mod session;
mod settings;

pub use answers::{AnswerSnapshot, AnswerStore};
pub use ids::{ParseIdError, QuestionId};
pub use question::{Question, QuestionDraft, QuestionError};
pub use session::{SessionError, SessionState, SessionStatus};
pub use settings::{LastQuestionExpiry, SessionSettings, SettingsError, TimerMode};
