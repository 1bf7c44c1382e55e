use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Structural problems with a single question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has an empty prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id} needs at least 2 options, got {len}")]
    TooFewOptions { id: QuestionId, len: usize },

    #[error("question {id} has an empty option at position {index}")]
    EmptyOption { id: QuestionId, index: usize },

    #[error("question {id} marks option {index} correct but only has {len} options")]
    CorrectOptionOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },
}

/// Problems with a question set as a whole.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error("question id {0} appears more than once")]
    DuplicateId(QuestionId),
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A multiple-choice question.
///
/// Constructed only through [`Question::new`], so every instance has a
/// non-empty prompt, at least two options and a correct option index that
/// points inside `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_option: usize,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or an option is blank, fewer than
    /// two options are given, or `correct_option` is out of range.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id,
                len: options.len(),
            });
        }
        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { id, index });
        }
        if correct_option >= options.len() {
            return Err(QuestionError::CorrectOptionOutOfRange {
                id,
                index: correct_option,
                len: options.len(),
            });
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct_option,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    /// Returns true if `option` is the correct answer.
    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }
}

//
// ─── QUESTION SET ─────────────────────────────────────────────────────────────
//

/// Ordered, immutable list of questions for one session.
///
/// An empty set is valid and means "no questions available".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Build a set, rejecting duplicate question ids.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::DuplicateId` if two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuestionSetError::DuplicateId(question.id()));
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn valid_question_builds() {
        let q = Question::new(QuestionId::new(1), "2 + 2?", opts(&["3", "4"]), 1).unwrap();
        assert_eq!(q.option_count(), 2);
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn correct_option_must_be_in_range() {
        let err = Question::new(QuestionId::new(7), "Q", opts(&["a", "b"]), 2).unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectOptionOutOfRange {
                id: QuestionId::new(7),
                index: 2,
                len: 2
            }
        );
    }

    #[test]
    fn needs_two_options_and_a_prompt() {
        let err = Question::new(QuestionId::new(1), "Q", opts(&["only"]), 0).unwrap_err();
        assert!(matches!(err, QuestionError::TooFewOptions { len: 1, .. }));

        let err = Question::new(QuestionId::new(1), "  ", opts(&["a", "b"]), 0).unwrap_err();
        assert!(matches!(err, QuestionError::EmptyPrompt { .. }));

        let err = Question::new(QuestionId::new(1), "Q", opts(&["a", ""]), 0).unwrap_err();
        assert!(matches!(err, QuestionError::EmptyOption { index: 1, .. }));
    }

    #[test]
    fn set_rejects_duplicate_ids() {
        let a = Question::new(QuestionId::new(1), "A", opts(&["x", "y"]), 0).unwrap();
        let b = Question::new(QuestionId::new(1), "B", opts(&["x", "y"]), 1).unwrap();
        let err = QuestionSet::new(vec![a, b]).unwrap_err();
        assert_eq!(err, QuestionSetError::DuplicateId(QuestionId::new(1)));
    }

    #[test]
    fn empty_set_is_valid() {
        let set = QuestionSet::new(Vec::new()).unwrap();
        assert!(set.is_empty());
        assert!(set.get(0).is_none());
    }
}
