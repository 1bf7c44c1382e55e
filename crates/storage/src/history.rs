//! Persisted shape of the quiz history ledger.
//!
//! The whole ledger lives in one key-value slot as a JSON array:
//!
//! ```json
//! [{ "id": "…", "score": 2, "totalQuestions": 2, "date": "2023-11-14T22:13:20+00:00" }]
//! ```
//!
//! New documents always carry RFC 3339 dates. Documents written by older
//! builds may carry locale dates such as `11/14/2023`; those are read as
//! midnight UTC of that day. Elements that still cannot be read are kept
//! verbatim and written back on the next save.

use log::warn;
use quiz_core::model::{HistoryRecord, RecordId};
use quiz_core::time::{format_completed_at, parse_completed_at};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

/// Key of the slot holding the serialized ledger.
pub const HISTORY_KEY: &str = "quizHistory";

/// Persisted shape for a history record.
///
/// Mirrors the domain `HistoryRecord` so the codec can evolve without
/// leaking wire names into the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecordRow {
    pub id: String,
    pub score: u32,
    pub total_questions: u32,
    pub date: String,
}

impl HistoryRecordRow {
    #[must_use]
    pub fn from_record(record: &HistoryRecord) -> Self {
        Self {
            id: record.id().to_string(),
            score: record.score(),
            total_questions: record.total_questions(),
            date: format_completed_at(record.completed_at()),
        }
    }

    /// Convert the row back into a domain `HistoryRecord`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the id or date cannot be
    /// parsed, or the counts violate record invariants.
    pub fn into_record(self) -> Result<HistoryRecord, StorageError> {
        let id: RecordId = self.id.parse().map_err(ser)?;
        let completed_at = parse_completed_at(&self.date)
            .ok_or_else(|| StorageError::Serialization(format!("invalid date: {}", self.date)))?;
        HistoryRecord::from_persisted(id, self.score, self.total_questions, completed_at)
            .map_err(ser)
    }
}

/// One element of the persisted array.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEntry {
    Record(HistoryRecord),
    /// An element this build cannot read. It is written back unchanged so
    /// rewriting the slot never loses history.
    Unreadable(serde_json::Value),
}

impl LedgerEntry {
    #[must_use]
    pub fn as_record(&self) -> Option<&HistoryRecord> {
        match self {
            LedgerEntry::Record(record) => Some(record),
            LedgerEntry::Unreadable(_) => None,
        }
    }
}

impl From<HistoryRecord> for LedgerEntry {
    fn from(record: HistoryRecord) -> Self {
        LedgerEntry::Record(record)
    }
}

/// A decoded ledger document in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedLedger {
    pub entries: Vec<LedgerEntry>,
}

impl DecodedLedger {
    pub fn records(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.entries.iter().filter_map(LedgerEntry::as_record)
    }

    /// Number of entries kept verbatim because they could not be read.
    #[must_use]
    pub fn unreadable(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, LedgerEntry::Unreadable(_)))
            .count()
    }
}

/// Serialize the full ledger, oldest entry first.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if JSON encoding fails.
pub fn encode_ledger(entries: &[LedgerEntry]) -> Result<String, StorageError> {
    let values = entries
        .iter()
        .map(|entry| match entry {
            LedgerEntry::Record(record) => serde_json::to_value(HistoryRecordRow::from_record(record)),
            LedgerEntry::Unreadable(value) => Ok(value.clone()),
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(ser)?;
    serde_json::to_string(&values).map_err(ser)
}

/// Decode a ledger document, keeping insertion order.
///
/// Entries that are not valid records become [`LedgerEntry::Unreadable`].
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the document is not a JSON array.
pub fn decode_ledger(raw: &str) -> Result<DecodedLedger, StorageError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw).map_err(ser)?;

    let entries = values
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            let record = serde_json::from_value::<HistoryRecordRow>(value.clone())
                .map_err(ser)
                .and_then(HistoryRecordRow::into_record);
            match record {
                Ok(record) => LedgerEntry::Record(record),
                Err(err) => {
                    warn!("keeping unreadable history entry {position} as-is: {err}");
                    LedgerEntry::Unreadable(value)
                }
            }
        })
        .collect();

    Ok(DecodedLedger { entries })
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}
