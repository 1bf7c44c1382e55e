//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{HistoryRecordError, QuestionSetError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::sessions::SessionPhase;

/// Errors emitted while fetching questions from the remote provider.
///
/// `QuestionSource::resolve` never returns these; they only explain why the
/// fallback set was used.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("question source is not configured")]
    NotConfigured,
    #[error("question source responded with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("question source returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("question source returned an invalid question set: {0}")]
    InvalidSet(#[from] QuestionSetError),
}

/// Errors emitted by the history ledger.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by session commands.
///
/// Rejections caused by user input carry a user-facing message and leave the
/// session untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no question is active (session is {phase})")]
    NotInProgress { phase: SessionPhase },
    #[error("option {index} does not exist; the question has {len} options")]
    OptionOutOfRange { index: usize, len: usize },
    #[error("must select an answer before advancing")]
    NoSelection,
    #[error("session is not completed yet")]
    NotCompleted,
    #[error(transparent)]
    Record(#[from] HistoryRecordError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl SessionError {
    /// True for rejections caused by user input rather than by a failure.
    #[must_use]
    pub fn is_user_rejection(&self) -> bool {
        matches!(
            self,
            SessionError::NotInProgress { .. }
                | SessionError::OptionOutOfRange { .. }
                | SessionError::NoSelection
        )
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    QuestionSource(#[from] QuestionSourceError),
}
