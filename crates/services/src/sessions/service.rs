use chrono::{DateTime, Utc};
use log::{debug, info};
use std::fmt;

use quiz_core::model::{HistoryRecord, Question, QuestionSet};

use super::progress::SessionProgress;
use super::view::{QuestionView, ResultView, SessionView};
use crate::error::SessionError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Macro-state of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Questions are still being resolved.
    Loading,
    /// The resolved set had no questions.
    Empty,
    InProgress,
    Completed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Loading => "loading",
            SessionPhase::Empty => "empty",
            SessionPhase::InProgress => "in progress",
            SessionPhase::Completed => "completed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Loading,
    Empty,
    InProgress {
        current: usize,
        selected: Option<usize>,
        score: u32,
    },
    Completed {
        score: u32,
        record: HistoryRecord,
        saved: bool,
    },
}

//
// ─── ADVANCE OUTCOME ───────────────────────────────────────────────────────────
//

/// What a successful `advance` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to the next question.
    Next { correct: bool },
    /// Judged the last question; the record should go to the ledger.
    Completed { correct: bool, record: HistoryRecord },
}

impl AdvanceOutcome {
    #[must_use]
    pub fn was_correct(&self) -> bool {
        match self {
            AdvanceOutcome::Next { correct } | AdvanceOutcome::Completed { correct, .. } => {
                *correct
            }
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State machine for one pass over a question set.
///
/// Each question is judged exactly once, when `advance` leaves it. The score
/// therefore never exceeds the number of questions already passed, and the
/// completion record reuses that same judgment.
///
/// Not thread-safe: commands must be issued one at a time.
pub struct QuizSession {
    questions: QuestionSet,
    state: SessionState,
}

impl QuizSession {
    /// A session whose questions are still being resolved.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            questions: QuestionSet::empty(),
            state: SessionState::Loading,
        }
    }

    /// A session ready to play `questions`.
    #[must_use]
    pub fn new(questions: QuestionSet) -> Self {
        let mut session = Self::loading();
        session.initialize(questions);
        session
    }

    /// Replace the question set and start from the first question.
    pub fn initialize(&mut self, questions: QuestionSet) {
        self.state = Self::initial_state(&questions);
        self.questions = questions;
        debug!(
            "session initialized with {} questions ({})",
            self.questions.len(),
            self.phase()
        );
    }

    /// Start over with the same question set. Does not touch history.
    ///
    /// A session that is still loading stays loading.
    pub fn reset(&mut self) {
        if matches!(self.state, SessionState::Loading) {
            return;
        }
        self.state = Self::initial_state(&self.questions);
        debug!("session reset");
    }

    /// Select an option of the current question; the last selection wins.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside the in-progress phase and
    /// `SessionError::OptionOutOfRange` for an index past the last option.
    pub fn select_option(&mut self, index: usize) -> Result<(), SessionError> {
        let phase = self.phase();
        let SessionState::InProgress {
            current, selected, ..
        } = &mut self.state
        else {
            return Err(SessionError::NotInProgress { phase });
        };

        let len = self
            .questions
            .get(*current)
            .map_or(0, Question::option_count);
        if index >= len {
            return Err(SessionError::OptionOutOfRange { index, len });
        }

        *selected = Some(index);
        debug!("question {current}: selected option {index}");
        Ok(())
    }

    /// Judge the current selection and move on.
    ///
    /// `completed_at` stamps the history record when this was the last
    /// question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside the in-progress phase and
    /// `SessionError::NoSelection` when no option is selected. The session is
    /// unchanged on error.
    pub fn advance(&mut self, completed_at: DateTime<Utc>) -> Result<AdvanceOutcome, SessionError> {
        let SessionState::InProgress {
            current,
            selected,
            score,
        } = self.state
        else {
            return Err(SessionError::NotInProgress {
                phase: self.phase(),
            });
        };
        let Some(selected) = selected else {
            return Err(SessionError::NoSelection);
        };
        let Some(question) = self.questions.get(current) else {
            return Err(SessionError::NotInProgress {
                phase: self.phase(),
            });
        };

        let correct = question.is_correct(selected);
        let score = if correct { score + 1 } else { score };
        let next = current + 1;

        if next < self.questions.len() {
            self.state = SessionState::InProgress {
                current: next,
                selected: None,
                score,
            };
            debug!("question {current} judged (correct: {correct}), moving to {next}");
            return Ok(AdvanceOutcome::Next { correct });
        }

        let record = HistoryRecord::new(score, self.questions.len(), completed_at)?;
        self.state = SessionState::Completed {
            score,
            record: record.clone(),
            saved: false,
        };
        info!(
            "quiz completed: {score}/{} correct",
            self.questions.len()
        );
        Ok(AdvanceOutcome::Completed { correct, record })
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Loading => SessionPhase::Loading,
            SessionState::Empty => SessionPhase::Empty,
            SessionState::InProgress { .. } => SessionPhase::InProgress,
            SessionState::Completed { .. } => SessionPhase::Completed,
        }
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Index of the question being answered; equals the total once completed.
    #[must_use]
    pub fn current_index(&self) -> usize {
        match self.state {
            SessionState::Loading | SessionState::Empty => 0,
            SessionState::InProgress { current, .. } => current,
            SessionState::Completed { .. } => self.questions.len(),
        }
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        match self.state {
            SessionState::InProgress { selected, .. } => selected,
            _ => None,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        match self.state {
            SessionState::InProgress { score, .. } | SessionState::Completed { score, .. } => score,
            SessionState::Loading | SessionState::Empty => 0,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Completed { .. })
    }

    /// The record produced on completion, if any.
    #[must_use]
    pub fn completed_record(&self) -> Option<&HistoryRecord> {
        match &self.state {
            SessionState::Completed { record, .. } => Some(record),
            _ => None,
        }
    }

    /// True once the completion record reached the ledger.
    #[must_use]
    pub fn is_record_saved(&self) -> bool {
        matches!(self.state, SessionState::Completed { saved: true, .. })
    }

    pub(crate) fn mark_record_saved(&mut self) {
        if let SessionState::Completed { saved, .. } = &mut self.state {
            *saved = true;
        }
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            judged: self.current_index(),
            score: self.score(),
            is_complete: self.is_complete(),
        }
    }

    /// The single derived view the presentation layer renders.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let total = self.total_questions();
        match &self.state {
            SessionState::Loading => SessionView::Loading,
            SessionState::Empty => SessionView::Empty,
            SessionState::InProgress {
                current,
                selected,
                score,
            } => match self.questions.get(*current) {
                Some(question) => SessionView::Question(QuestionView {
                    number: current + 1,
                    total,
                    prompt: question.prompt().to_owned(),
                    options: question.options().to_vec(),
                    selected: *selected,
                    score: *score,
                    is_last: current + 1 == total,
                }),
                None => SessionView::Empty,
            },
            SessionState::Completed { score, record, .. } => SessionView::Completed(ResultView {
                score: *score,
                total,
                percentage: record.percentage(),
            }),
        }
    }

    fn initial_state(questions: &QuestionSet) -> SessionState {
        if questions.is_empty() {
            SessionState::Empty
        } else {
            SessionState::InProgress {
                current: 0,
                selected: None,
                score: 0,
            }
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("phase", &self.phase())
            .field("current", &self.current_index())
            .field("selected", &self.selected_option())
            .field("score", &self.score())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
