use std::env;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use quiz_core::model::{Question, QuestionId, QuestionSet};
use reqwest::Client;
use serde::Deserialize;

use crate::error::QuestionSourceError;
use crate::fallback::fallback_questions;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where a resolved question set came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionOrigin {
    /// Fetched from the remote provider.
    Remote,
    /// Supplied directly by the caller.
    Static,
    /// Built-in set used because the remote fetch failed.
    Fallback { reason: String },
}

impl QuestionOrigin {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, QuestionOrigin::Fallback { .. })
    }
}

/// A question set plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuestions {
    pub questions: QuestionSet,
    pub origin: QuestionOrigin,
}

/// Resolves the ordered question list for a new session.
///
/// `resolve` makes a single attempt and never fails: remote problems resolve
/// to the built-in set. Retrying is up to the caller.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn resolve(&self) -> ResolvedQuestions;
}

//
// ─── HTTP SOURCE ───────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct QuestionSourceConfig {
    pub url: Option<String>,
    pub timeout: Duration,
}

impl Default for QuestionSourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl QuestionSourceConfig {
    /// Reads `QUIZ_QUESTIONS_URL` and `QUIZ_HTTP_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        let url = env::var("QUIZ_QUESTIONS_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let timeout = env::var("QUIZ_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);
        Self { url, timeout }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Fetches questions with `GET <url>`, falling back to the built-in set.
#[derive(Clone)]
pub struct HttpQuestionSource {
    client: Client,
    config: QuestionSourceConfig,
}

impl HttpQuestionSource {
    /// Build a source with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::Http` if the client cannot be built.
    pub fn new(config: QuestionSourceConfig) -> Result<Self, QuestionSourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.url.is_some()
    }

    /// Fetch and validate the remote question set.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` when the source is not configured, the
    /// request fails, the status is not a success, or the body is not a valid
    /// question set.
    pub async fn fetch_remote(&self) -> Result<QuestionSet, QuestionSourceError> {
        let url = self
            .config
            .url
            .as_deref()
            .ok_or(QuestionSourceError::NotConfigured)?;

        debug!("fetching questions from {url}");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(QuestionSourceError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        let wire: Vec<WireQuestion> = serde_json::from_str(&body)?;
        into_question_set(wire)
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn resolve(&self) -> ResolvedQuestions {
        match self.fetch_remote().await {
            Ok(questions) => {
                info!("loaded {} questions from remote source", questions.len());
                ResolvedQuestions {
                    questions,
                    origin: QuestionOrigin::Remote,
                }
            }
            Err(err) => {
                warn!("using offline questions: {err}");
                resolve_fallback(err.to_string())
            }
        }
    }
}

fn resolve_fallback(reason: String) -> ResolvedQuestions {
    let questions = fallback_questions().unwrap_or_else(|err| {
        error!("built-in question set is invalid: {err}");
        QuestionSet::empty()
    });
    ResolvedQuestions {
        questions,
        origin: QuestionOrigin::Fallback { reason },
    }
}

//
// ─── STATIC SOURCE ─────────────────────────────────────────────────────────────
//

/// Source that always resolves to the same, caller-provided set.
#[derive(Clone, Debug)]
pub struct StaticQuestionSource {
    questions: QuestionSet,
}

impl StaticQuestionSource {
    #[must_use]
    pub fn new(questions: QuestionSet) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn resolve(&self) -> ResolvedQuestions {
        ResolvedQuestions {
            questions: self.questions.clone(),
            origin: QuestionOrigin::Static,
        }
    }
}

//
// ─── WIRE FORMAT ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuestion {
    id: u64,
    question: String,
    options: Vec<String>,
    correct_answer: usize,
}

fn into_question_set(wire: Vec<WireQuestion>) -> Result<QuestionSet, QuestionSourceError> {
    let questions = wire
        .into_iter()
        .map(|q| Question::new(QuestionId::new(q.id), q.question, q.options, q.correct_answer))
        .collect::<Result<Vec<_>, _>>()
        .map_err(quiz_core::model::QuestionSetError::from)?;
    Ok(QuestionSet::new(questions)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<QuestionSet, QuestionSourceError> {
        let wire: Vec<WireQuestion> = serde_json::from_str(json)?;
        into_question_set(wire)
    }

    #[test]
    fn wire_questions_map_to_domain() {
        let set = parse(
            r#"[
                {"id": 1, "question": "Q1", "options": ["a", "b"], "correctAnswer": 1},
                {"id": 2, "question": "Q2", "options": ["c", "d", "e"], "correctAnswer": 0}
            ]"#,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().correct_option(), 1);
        assert_eq!(set.get(1).unwrap().options().len(), 3);
    }

    #[test]
    fn one_bad_question_rejects_the_set() {
        let err = parse(
            r#"[
                {"id": 1, "question": "Q1", "options": ["a", "b"], "correctAnswer": 1},
                {"id": 2, "question": "Q2", "options": ["c", "d"], "correctAnswer": 5}
            ]"#,
        )
        .unwrap_err();
        assert!(matches!(err, QuestionSourceError::InvalidSet(_)));
    }

    #[test]
    fn empty_array_is_a_valid_empty_set() {
        assert!(parse("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn unconfigured_source_falls_back() {
        let source = HttpQuestionSource::new(QuestionSourceConfig::default()).unwrap();
        assert!(!source.enabled());
        let resolved = source.resolve().await;
        assert!(resolved.origin.is_fallback());
        assert!(!resolved.questions.is_empty());
    }
}
