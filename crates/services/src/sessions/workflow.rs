use std::sync::Arc;

use log::{info, warn};
use quiz_core::model::HistoryRecord;

use super::service::{AdvanceOutcome, QuizSession};
use crate::Clock;
use crate::error::{HistoryError, SessionError};
use crate::history::{ClearReport, HistoryLedger};
use crate::question_source::{QuestionOrigin, QuestionSource};

/// A freshly initialized session and where its questions came from.
#[derive(Debug)]
pub struct StartedSession {
    pub session: QuizSession,
    pub origin: QuestionOrigin,
}

/// Result of advancing past one question.
#[derive(Debug)]
pub struct AdvanceResult {
    pub correct: bool,
    pub is_complete: bool,
    /// The record emitted on completion.
    pub record: Option<HistoryRecord>,
    /// Set when the completion record could not be saved; the session keeps
    /// it so `finalize_record` can retry.
    pub save_error: Option<HistoryError>,
}

/// Orchestrates session start, answering and history persistence.
///
/// Every method awaits its I/O before returning, so a caller that issues one
/// command at a time never interleaves a reset with an in-flight append.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    ledger: Arc<HistoryLedger>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>, ledger: Arc<HistoryLedger>) -> Self {
        Self {
            clock,
            source,
            ledger,
        }
    }

    #[must_use]
    pub fn ledger(&self) -> Arc<HistoryLedger> {
        Arc::clone(&self.ledger)
    }

    /// Resolve questions and initialize a new session with them.
    ///
    /// Calling this again is how a caller retries the remote source.
    pub async fn start_session(&self) -> StartedSession {
        let resolved = self.source.resolve().await;
        if let QuestionOrigin::Fallback { reason } = &resolved.origin {
            info!("starting session with offline questions ({reason})");
        }
        StartedSession {
            session: QuizSession::new(resolved.questions),
            origin: resolved.origin,
        }
    }

    /// Judge the current answer, move on, and append the record to the
    /// ledger when the session completes.
    ///
    /// A failed append does not fail the command; it is reported in
    /// `AdvanceResult::save_error`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the engine rejects the command.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<AdvanceResult, SessionError> {
        let outcome = session.advance(self.clock.now())?;

        let (correct, record) = match outcome {
            AdvanceOutcome::Next { correct } => {
                return Ok(AdvanceResult {
                    correct,
                    is_complete: false,
                    record: None,
                    save_error: None,
                });
            }
            AdvanceOutcome::Completed { correct, record } => (correct, record),
        };

        let save_error = match self.ledger.append(record.clone()).await {
            Ok(_) => {
                session.mark_record_saved();
                None
            }
            Err(err) => {
                warn!("quiz result could not be saved: {err}");
                Some(err)
            }
        };

        Ok(AdvanceResult {
            correct,
            is_complete: true,
            record: Some(record),
            save_error,
        })
    }

    /// Retry saving the completion record after a failed append.
    ///
    /// Returns the record without writing again if it is already saved.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` if the session is not complete and
    /// `SessionError::History` if the append fails again.
    pub async fn finalize_record(
        &self,
        session: &mut QuizSession,
    ) -> Result<HistoryRecord, SessionError> {
        let record = session
            .completed_record()
            .cloned()
            .ok_or(SessionError::NotCompleted)?;
        if session.is_record_saved() {
            return Ok(record);
        }

        self.ledger.append(record.clone()).await?;
        session.mark_record_saved();
        Ok(record)
    }

    /// Past results, oldest first.
    pub async fn view_history(&self) -> Vec<HistoryRecord> {
        self.ledger.records().await
    }

    pub async fn clear_history(&self) -> ClearReport {
        self.ledger.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question_source::StaticQuestionSource;
    use quiz_core::model::{Question, QuestionId, QuestionSet};
    use quiz_core::time::fixed_clock;

    fn service(questions: QuestionSet) -> QuizLoopService {
        QuizLoopService::new(
            fixed_clock(),
            Arc::new(StaticQuestionSource::new(questions)),
            Arc::new(HistoryLedger::in_memory()),
        )
    }

    fn single_question() -> QuestionSet {
        let q = Question::new(QuestionId::new(1), "Q", vec!["a".into(), "b".into()], 1).unwrap();
        QuestionSet::new(vec![q]).unwrap()
    }

    #[tokio::test]
    async fn completion_appends_exactly_one_record() {
        let svc = service(single_question());
        let StartedSession { mut session, origin } = svc.start_session().await;
        assert_eq!(origin, QuestionOrigin::Static);

        session.select_option(1).unwrap();
        let result = svc.advance(&mut session).await.unwrap();
        assert!(result.is_complete);
        assert!(result.save_error.is_none());
        assert!(session.is_record_saved());

        let record = svc.finalize_record(&mut session).await.unwrap();
        assert_eq!(record.score(), 1);
        assert_eq!(svc.view_history().await.len(), 1);
    }

    #[tokio::test]
    async fn finalize_requires_completion() {
        let svc = service(single_question());
        let mut session = svc.start_session().await.session;
        let err = svc.finalize_record(&mut session).await.unwrap_err();
        assert!(matches!(err, SessionError::NotCompleted));
    }

    #[tokio::test]
    async fn rejected_advance_does_not_touch_history() {
        let svc = service(single_question());
        let mut session = svc.start_session().await.session;
        let err = svc.advance(&mut session).await.unwrap_err();
        assert!(matches!(err, SessionError::NoSelection));
        assert!(svc.view_history().await.is_empty());
    }
}
