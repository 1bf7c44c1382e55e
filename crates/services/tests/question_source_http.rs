use std::time::Duration;

use services::{
    HttpQuestionSource, QuestionOrigin, QuestionSource, QuestionSourceConfig, QuestionSourceError,
    QuizSession, SessionPhase,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const QUESTIONS_JSON: &str = r#"[
    {"id": 10, "question": "Capital of Italy?", "options": ["Rome", "Milan"], "correctAnswer": 0},
    {"id": 11, "question": "2 + 3?", "options": ["4", "5", "6"], "correctAnswer": 1}
]"#;

fn source_for(server: &MockServer) -> HttpQuestionSource {
    let config = QuestionSourceConfig {
        url: Some(format!("{}/questions", server.uri())),
        timeout: Duration::from_secs(5),
    };
    HttpQuestionSource::new(config).expect("client")
}

#[tokio::test]
async fn remote_questions_are_used_when_available() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/questions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(QUESTIONS_JSON))
        .mount(&server)
        .await;

    let resolved = source_for(&server).resolve().await;
    assert_eq!(resolved.origin, QuestionOrigin::Remote);
    assert_eq!(resolved.questions.len(), 2);
    assert_eq!(resolved.questions.get(1).unwrap().prompt(), "2 + 3?");
}

#[tokio::test]
async fn server_error_falls_back_to_builtin_questions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/questions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = source_for(&server);
    let err = source.fetch_remote().await.unwrap_err();
    assert!(matches!(err, QuestionSourceError::HttpStatus(status) if status.as_u16() == 500));

    let resolved = source.resolve().await;
    assert!(resolved.origin.is_fallback());
    assert!(!resolved.questions.is_empty());

    let session = QuizSession::new(resolved.questions);
    assert_eq!(session.phase(), SessionPhase::InProgress);
}

#[tokio::test]
async fn malformed_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/questions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let source = source_for(&server);
    assert!(matches!(
        source.fetch_remote().await.unwrap_err(),
        QuestionSourceError::Decode(_)
    ));
    assert!(source.resolve().await.origin.is_fallback());
}

#[tokio::test]
async fn structurally_invalid_question_rejects_whole_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/questions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[
                {"id": 1, "question": "Ok?", "options": ["a", "b"], "correctAnswer": 0},
                {"id": 2, "question": "Broken?", "options": ["a", "b"], "correctAnswer": 2}
            ]"#,
        ))
        .mount(&server)
        .await;

    let source = source_for(&server);
    assert!(matches!(
        source.fetch_remote().await.unwrap_err(),
        QuestionSourceError::InvalidSet(_)
    ));
    let resolved = source.resolve().await;
    assert!(resolved.origin.is_fallback());
    assert!(resolved.questions.iter().all(|q| q.prompt() != "Broken?"));
}

#[tokio::test]
async fn empty_remote_array_gives_empty_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/questions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let resolved = source_for(&server).resolve().await;
    assert_eq!(resolved.origin, QuestionOrigin::Remote);
    let session = QuizSession::new(resolved.questions);
    assert_eq!(session.phase(), SessionPhase::Empty);
}

#[tokio::test]
async fn unreachable_server_falls_back() {
    let server = MockServer::start().await;
    let source = source_for(&server);
    drop(server);

    let resolved = source.resolve().await;
    assert!(resolved.origin.is_fallback());
}
