use quiz_core::model::HistoryRecord;
use quiz_core::time::fixed_now;
use storage::history::{LedgerEntry, decode_ledger, encode_ledger};
use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;
use storage::HISTORY_KEY;

#[tokio::test]
async fn sqlite_set_get_delete_round_trip() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get(HISTORY_KEY).await.unwrap(), None);

    repo.set(HISTORY_KEY, "[]").await.unwrap();
    assert_eq!(repo.get(HISTORY_KEY).await.unwrap().as_deref(), Some("[]"));

    repo.set(HISTORY_KEY, "[{}]").await.unwrap();
    assert_eq!(repo.get(HISTORY_KEY).await.unwrap().as_deref(), Some("[{}]"));

    repo.delete(HISTORY_KEY).await.unwrap();
    assert_eq!(repo.get(HISTORY_KEY).await.unwrap(), None);

    // deleting twice is fine
    repo.delete(HISTORY_KEY).await.unwrap();
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set("k", "v").await.unwrap();
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn ledger_document_survives_sqlite_storage() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_ledger?mode=memory&cache=shared")
        .await
        .expect("storage");

    let first = HistoryRecord::new(1, 2, fixed_now()).unwrap();
    let second = HistoryRecord::new(2, 2, fixed_now()).unwrap();
    let doc = encode_ledger(&[LedgerEntry::from(first.clone()), second.clone().into()]).unwrap();
    storage.kv.set(HISTORY_KEY, &doc).await.unwrap();

    let raw = storage.kv.get(HISTORY_KEY).await.unwrap().expect("stored");
    let decoded = decode_ledger(&raw).unwrap();
    let records: Vec<HistoryRecord> = decoded.records().cloned().collect();
    assert_eq!(records, vec![first, second]);
}
