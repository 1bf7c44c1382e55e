//! Append-only ledger of finished quiz sessions.
//!
//! The ledger is loaded once, kept in memory, and mirrored to the
//! `"quizHistory"` slot of a [`KeyValueStore`] on every append and clear.
//! History is best-effort: a slot that is not a ledger at all loads as an
//! empty ledger and never blocks quiz-taking. Individual entries that cannot
//! be read are hidden from callers but written back on every append.

use std::sync::Arc;

use log::{info, warn};
use quiz_core::model::HistoryRecord;
use storage::HISTORY_KEY;
use storage::history::{LedgerEntry, decode_ledger, encode_ledger};
use storage::repository::{InMemoryRepository, KeyValueStore};
use tokio::sync::Mutex;

use crate::error::HistoryError;

/// Outcome of [`HistoryLedger::clear`].
///
/// The in-memory ledger is always empty after a clear; `store_error` is set
/// only when the persisted slot could not be emptied either, in which case
/// the old history may reappear after a restart.
#[derive(Debug, Default)]
pub struct ClearReport {
    pub store_error: Option<HistoryError>,
}

impl ClearReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.store_error.is_none()
    }
}

pub struct HistoryLedger {
    store: Arc<dyn KeyValueStore>,
    entries: Mutex<Vec<LedgerEntry>>,
}

impl HistoryLedger {
    /// Load the persisted ledger from `store`.
    ///
    /// Read or decode failures degrade to an empty ledger.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = read_persisted(store.as_ref()).await;
        Self {
            store,
            entries: Mutex::new(entries),
        }
    }

    /// A ledger backed by a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemoryRepository::new()),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the ledger, oldest record first.
    pub async fn records(&self) -> Vec<HistoryRecord> {
        records_of(&self.entries.lock().await)
    }

    pub async fn len(&self) -> usize {
        self.entries
            .lock()
            .await
            .iter()
            .filter_map(LedgerEntry::as_record)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Persisted entries that could not be read; they are kept as-is.
    pub async fn unreadable_count(&self) -> usize {
        self.entries
            .lock()
            .await
            .iter()
            .filter(|entry| entry.as_record().is_none())
            .count()
    }

    /// Re-read the persisted slot, replacing the in-memory ledger.
    pub async fn reload(&self) -> Vec<HistoryRecord> {
        let mut guard = self.entries.lock().await;
        *guard = read_persisted(self.store.as_ref()).await;
        records_of(&guard)
    }

    /// Append `record`, persist the full ledger and return its records.
    ///
    /// Unreadable entries are written back unchanged. The in-memory ledger
    /// only changes once the store accepted the write. Appending a record
    /// whose id is already present is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the ledger cannot be encoded or
    /// stored.
    pub async fn append(&self, record: HistoryRecord) -> Result<Vec<HistoryRecord>, HistoryError> {
        let mut guard = self.entries.lock().await;
        if guard
            .iter()
            .filter_map(LedgerEntry::as_record)
            .any(|existing| existing.id() == record.id())
        {
            return Ok(records_of(&guard));
        }

        let mut updated = guard.clone();
        updated.push(record.into());
        let doc = encode_ledger(&updated)?;
        self.store.set(HISTORY_KEY, &doc).await?;

        info!("history now holds {} entries", updated.len());
        *guard = updated;
        Ok(records_of(&guard))
    }

    /// Erase the ledger in memory and in the store.
    ///
    /// If the store refuses the delete, the slot is overwritten with an empty
    /// ledger instead so memory and store agree.
    pub async fn clear(&self) -> ClearReport {
        let mut guard = self.entries.lock().await;
        guard.clear();

        let Err(delete_err) = self.store.delete(HISTORY_KEY).await else {
            info!("history cleared");
            return ClearReport::default();
        };
        warn!("deleting history failed, overwriting instead: {delete_err}");

        match self.store.set(HISTORY_KEY, "[]").await {
            Ok(()) => ClearReport::default(),
            Err(err) => {
                warn!("history cleared in memory only: {err}");
                ClearReport {
                    store_error: Some(delete_err.into()),
                }
            }
        }
    }
}

fn records_of(entries: &[LedgerEntry]) -> Vec<HistoryRecord> {
    entries
        .iter()
        .filter_map(LedgerEntry::as_record)
        .cloned()
        .collect()
}

async fn read_persisted(store: &dyn KeyValueStore) -> Vec<LedgerEntry> {
    let raw = match store.get(HISTORY_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!("loading history failed: {err}");
            return Vec::new();
        }
    };

    match decode_ledger(&raw) {
        Ok(decoded) => {
            let unreadable = decoded.unreadable();
            if unreadable > 0 {
                warn!("{unreadable} history entries could not be read and are kept as-is");
            }
            decoded.entries
        }
        Err(err) => {
            warn!("history is unreadable, starting empty: {err}");
            Vec::new()
        }
    }
}
