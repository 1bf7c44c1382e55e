use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::history::HistoryLedger;
use crate::question_source::{HttpQuestionSource, QuestionSource, QuestionSourceConfig};
use crate::sessions::QuizLoopService;

/// Assembles app-facing services.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    ledger: Arc<HistoryLedger>,
    remote_enabled: bool,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the HTTP client
    /// setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        source: QuestionSourceConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock, source).await
    }

    /// Build services backed by an in-memory store; history is lost on exit.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client setup fails.
    pub async fn new_in_memory(
        clock: Clock,
        source: QuestionSourceConfig,
    ) -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::in_memory(), clock, source).await
    }

    async fn from_storage(
        storage: Storage,
        clock: Clock,
        source: QuestionSourceConfig,
    ) -> Result<Self, AppServicesError> {
        let ledger = Arc::new(HistoryLedger::load(Arc::clone(&storage.kv)).await);
        let http = HttpQuestionSource::new(source)?;
        let remote_enabled = http.enabled();
        let source: Arc<dyn QuestionSource> = Arc::new(http);
        let quiz_loop = Arc::new(QuizLoopService::new(clock, source, Arc::clone(&ledger)));

        Ok(Self {
            quiz_loop,
            ledger,
            remote_enabled,
        })
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn ledger(&self) -> Arc<HistoryLedger> {
        Arc::clone(&self.ledger)
    }

    /// True when a remote question URL is configured.
    #[must_use]
    pub fn remote_enabled(&self) -> bool {
        self.remote_enabled
    }
}
