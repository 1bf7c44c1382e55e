#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod fallback;
pub mod history;
pub mod question_source;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use error::{AppServicesError, HistoryError, QuestionSourceError, SessionError};
pub use history::{ClearReport, HistoryLedger};
pub use question_source::{
    HttpQuestionSource, QuestionOrigin, QuestionSource, QuestionSourceConfig, ResolvedQuestions,
    StaticQuestionSource,
};

pub use sessions::{
    AdvanceOutcome, AdvanceResult, QuestionView, QuizLoopService, QuizSession, ResultView,
    SessionPhase, SessionProgress, SessionView, StartedSession,
};
