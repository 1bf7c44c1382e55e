//! Built-in questions used when the remote provider is unavailable.

use quiz_core::model::{Question, QuestionId, QuestionSet, QuestionSetError};

const FALLBACK: &[(u64, &str, &[&str], usize)] = &[
    (
        1,
        "What is the capital of France?",
        &["Berlin", "Madrid", "Paris", "Rome"],
        2,
    ),
    (
        2,
        "Which planet is known as the Red Planet?",
        &["Venus", "Mars", "Jupiter", "Saturn"],
        1,
    ),
    (3, "How many continents are there on Earth?", &["5", "6", "7", "8"], 2),
    (
        4,
        "What is the largest ocean on Earth?",
        &["Atlantic", "Indian", "Arctic", "Pacific"],
        3,
    ),
    (
        5,
        "Which gas do plants absorb from the air for photosynthesis?",
        &["Carbon dioxide", "Oxygen", "Nitrogen", "Helium"],
        0,
    ),
];

/// Returns the built-in question set.
///
/// # Errors
///
/// Returns `QuestionSetError` only if the table above is malformed, which the
/// tests below rule out.
pub fn fallback_questions() -> Result<QuestionSet, QuestionSetError> {
    let questions = FALLBACK
        .iter()
        .map(|(id, prompt, options, correct)| {
            Question::new(
                QuestionId::new(*id),
                *prompt,
                options.iter().map(|o| (*o).to_string()).collect(),
                *correct,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    QuestionSet::new(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_set_is_valid_and_non_empty() {
        let set = fallback_questions().unwrap();
        assert_eq!(set.len(), FALLBACK.len());
        for question in set.iter() {
            assert!(question.correct_option() < question.option_count());
        }
    }
}
