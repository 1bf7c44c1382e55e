use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::RecordId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryRecordError {
    #[error("a finished quiz must have at least one question")]
    NoQuestions,

    #[error("score ({score}) exceeds total questions ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },

    #[error("too many questions for a single record: {len}")]
    TooManyQuestions { len: usize },
}

/// Outcome of one completed quiz session.
///
/// Immutable once created; `score <= total_questions` and
/// `total_questions >= 1` always hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    id: RecordId,
    score: u32,
    total_questions: u32,
    completed_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Create a record for a session that just finished.
    ///
    /// # Errors
    ///
    /// Returns `HistoryRecordError` if the counts violate record invariants.
    pub fn new(
        score: u32,
        total_questions: usize,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, HistoryRecordError> {
        let total = u32::try_from(total_questions)
            .map_err(|_| HistoryRecordError::TooManyQuestions {
                len: total_questions,
            })?;
        Self::from_persisted(RecordId::generate(), score, total, completed_at)
    }

    /// Rehydrate a record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `HistoryRecordError` if the counts violate record invariants.
    pub fn from_persisted(
        id: RecordId,
        score: u32,
        total_questions: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, HistoryRecordError> {
        if total_questions == 0 {
            return Err(HistoryRecordError::NoQuestions);
        }
        if score > total_questions {
            return Err(HistoryRecordError::ScoreExceedsTotal {
                score,
                total: total_questions,
            });
        }
        Ok(Self {
            id,
            score,
            total_questions,
            completed_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Score as a whole percentage, rounded half away from zero.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        percentage(self.score, self.total_questions)
    }
}

/// `round(score / total * 100)`; zero when `total` is zero.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let pct = (u64::from(score) * 200 + u64::from(total)) / (u64::from(total) * 2);
    u32::try_from(pct).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn new_record_gets_fresh_id() {
        let a = HistoryRecord::new(2, 2, fixed_now()).unwrap();
        let b = HistoryRecord::new(2, 2, fixed_now()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.total_questions(), 2);
    }

    #[test]
    fn record_invariants_are_enforced() {
        let err = HistoryRecord::new(0, 0, fixed_now()).unwrap_err();
        assert_eq!(err, HistoryRecordError::NoQuestions);

        let err = HistoryRecord::new(3, 2, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            HistoryRecordError::ScoreExceedsTotal { score: 3, total: 2 }
        );
    }

    #[test]
    fn percentage_rounds() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(0, 0), 0);
    }
}
