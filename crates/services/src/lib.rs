#![forbid(unsafe_code)]

pub mod error;
pub mod navigation;
pub mod ports;
pub mod progress;
pub mod runtime;

pub use interview_core::Clock;

pub use error::{NavigationError, RuntimeError};
pub use navigation::{NavigationController, TickOutcome, Transition};
pub use ports::{CompletionReason, CompletionSummary, NoopPorts, RecordingPorts, SessionPorts};
pub use progress::{SessionProgress, format_remaining};
pub use runtime::{SessionEvent, SessionHandle, SessionRuntime};
