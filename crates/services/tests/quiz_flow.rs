use std::sync::Arc;

use quiz_core::model::{Question, QuestionId, QuestionSet};
use quiz_core::time::fixed_now;
use services::{
    Clock, HistoryLedger, QuestionOrigin, QuizLoopService, SessionError, SessionPhase,
    StaticQuestionSource,
};
use storage::repository::{InMemoryRepository, KeyValueStore};

fn two_question_set() -> QuestionSet {
    let q1 = Question::new(
        QuestionId::new(1),
        "First?",
        vec!["a".into(), "b".into(), "c".into()],
        1,
    )
    .unwrap();
    let q2 = Question::new(
        QuestionId::new(2),
        "Second?",
        vec!["x".into(), "y".into()],
        0,
    )
    .unwrap();
    QuestionSet::new(vec![q1, q2]).unwrap()
}

async fn loop_service(store: Arc<InMemoryRepository>) -> QuizLoopService {
    let ledger = Arc::new(HistoryLedger::load(store).await);
    QuizLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(StaticQuestionSource::new(two_question_set())),
        ledger,
    )
}

#[tokio::test]
async fn correct_run_then_wrong_run_are_both_recorded() {
    let store = Arc::new(InMemoryRepository::new());
    let svc = loop_service(store.clone()).await;
    let started = svc.start_session().await;
    assert_eq!(started.origin, QuestionOrigin::Static);
    let mut session = started.session;

    session.select_option(1).unwrap();
    let result = svc.advance(&mut session).await.unwrap();
    assert!(result.correct);
    assert!(!result.is_complete);
    assert_eq!(session.score(), 1);
    assert_eq!(session.current_index(), 1);
    assert_eq!(session.phase(), SessionPhase::InProgress);

    session.select_option(0).unwrap();
    let result = svc.advance(&mut session).await.unwrap();
    assert!(result.is_complete);
    assert_eq!(session.score(), 2);
    assert_eq!(session.current_index(), 2);
    assert_eq!(session.phase(), SessionPhase::Completed);

    let history = svc.view_history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].score(), 2);
    assert_eq!(history[0].total_questions(), 2);

    // take again, answering wrong both times
    session.reset();
    assert_eq!(svc.view_history().await.len(), 1);
    session.select_option(2).unwrap();
    svc.advance(&mut session).await.unwrap();
    session.select_option(1).unwrap();
    svc.advance(&mut session).await.unwrap();

    let history = svc.view_history().await;
    assert_eq!(history.len(), 2);
    let last = history.last().unwrap();
    assert_eq!(last.score(), 0);
    assert_eq!(last.total_questions(), 2);

    // a fresh process sees both records in insertion order
    let reopened = HistoryLedger::load(store).await;
    let scores: Vec<u32> = reopened.records().await.iter().map(|r| r.score()).collect();
    assert_eq!(scores, vec![2, 0]);
}

#[tokio::test]
async fn advance_without_selection_is_rejected_in_every_phase() {
    let svc = loop_service(Arc::new(InMemoryRepository::new())).await;
    let mut session = svc.start_session().await.session;

    let err = svc.advance(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::NoSelection));
    assert_eq!(session.current_index(), 0);

    session.select_option(1).unwrap();
    svc.advance(&mut session).await.unwrap();
    session.select_option(0).unwrap();
    svc.advance(&mut session).await.unwrap();

    let err = svc.advance(&mut session).await.unwrap_err();
    assert!(err.is_user_rejection());
    assert_eq!(session.score(), 2);
    assert_eq!(svc.view_history().await.len(), 1);
}

#[tokio::test]
async fn clear_history_empties_memory_and_store() {
    let store = Arc::new(InMemoryRepository::new());
    let svc = loop_service(store.clone()).await;
    let mut session = svc.start_session().await.session;
    session.select_option(1).unwrap();
    svc.advance(&mut session).await.unwrap();
    session.select_option(1).unwrap();
    svc.advance(&mut session).await.unwrap();
    assert_eq!(svc.view_history().await.len(), 1);

    let report = svc.clear_history().await;
    assert!(report.is_clean());
    assert!(svc.view_history().await.is_empty());
    assert_eq!(store.get(storage::HISTORY_KEY).await.unwrap(), None);

    let reopened = HistoryLedger::load(store).await;
    assert!(reopened.is_empty().await);
}
