mod history;
mod ids;
mod question;

pub use ids::{ParseIdError, QuestionId, RecordId};

pub use history::{HistoryRecord, HistoryRecordError, percentage};
pub use question::{Question, QuestionError, QuestionSet, QuestionSetError};
