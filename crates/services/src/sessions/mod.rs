mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{AdvanceOutcome, QuizSession, SessionPhase};
pub use view::{QuestionView, ResultView, SessionView};
pub use workflow::{AdvanceResult, QuizLoopService, StartedSession};
