//! Integration tests for database inspection.

use chatview::inspect::{inspect, PayloadReport, SampleValue};
use chatview::ErrorKind;
use rusqlite::Connection;
use tempfile::TempDir;

fn webui_db(dir: &TempDir, payload: Option<&str>) -> std::path::PathBuf {
    let path = dir.path().join("webui.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE user (id TEXT PRIMARY KEY, name TEXT);
         CREATE TABLE chat (id VARCHAR(255) PRIMARY KEY, title TEXT, chat TEXT, updated_at BIGINT);",
    )
    .unwrap();
    if let Some(payload) = payload {
        conn.execute(
            "INSERT INTO chat (id, title, chat, updated_at) VALUES ('c1', ?1, ?2, 1)",
            rusqlite::params!["x".repeat(150), payload],
        )
        .unwrap();
    }
    path
}

#[test]
fn test_tables_columns_and_count() {
    let dir = TempDir::new().unwrap();
    let db = webui_db(&dir, None);

    let report = inspect(&db).unwrap();
    assert!(report.tables.contains(&"user".to_string()));
    assert!(report.tables.contains(&"chat".to_string()));

    let chat = report.chat_table.unwrap();
    let columns: Vec<(&str, &str)> = chat
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.decl_type.as_str()))
        .collect();
    assert_eq!(
        columns,
        vec![
            ("id", "VARCHAR(255)"),
            ("title", "TEXT"),
            ("chat", "TEXT"),
            ("updated_at", "BIGINT"),
        ]
    );
    assert_eq!(chat.row_count, 0);
    assert!(chat.sample.is_none());
}

#[test]
fn test_sample_record_fields_and_extraction() {
    let dir = TempDir::new().unwrap();
    let db = webui_db(
        &dir,
        Some(r#"{"history":{"messages":[{"role":"user","content":"hi"}]}}"#),
    );

    let report = inspect(&db).unwrap();
    let chat = report.chat_table.unwrap();
    assert_eq!(chat.row_count, 1);

    let sample = chat.sample.unwrap();
    let names: Vec<&str> = sample.fields.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["id", "title", "chat", "updated_at"]);

    let SampleValue::Text(title) = &sample.fields[1].1 else {
        panic!("expected text title");
    };
    // 100 chars + "..."
    assert_eq!(title.len(), 103);
    assert!(matches!(sample.fields[2].1, SampleValue::Payload(_)));
    assert!(matches!(&sample.fields[3].1, SampleValue::Text(v) if v == "1"));

    let Some(PayloadReport::Parsed(overview)) = sample.payload() else {
        panic!("expected parsed payload");
    };
    assert_eq!(overview.extraction.location, Some("history.messages"));
    assert_eq!(overview.extraction.message_count, 1);
}

#[test]
fn test_sample_with_invalid_payload() {
    let dir = TempDir::new().unwrap();
    let db = webui_db(&dir, Some("not json at all"));

    let sample = inspect(&db).unwrap().chat_table.unwrap().sample.unwrap();
    match sample.payload() {
        Some(PayloadReport::Invalid { raw_preview, .. }) => {
            assert_eq!(raw_preview, "not json at all")
        }
        other => panic!("unexpected payload report: {:?}", other),
    }
}

#[test]
fn test_database_without_chat_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("other.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE notes (id INTEGER)")
        .unwrap();

    let report = inspect(&path).unwrap();
    assert_eq!(report.tables, vec!["notes".to_string()]);
    assert!(report.chat_table.is_none());
}

#[test]
fn test_missing_and_corrupt_files_fail() {
    let dir = TempDir::new().unwrap();

    let err = inspect(&dir.path().join("absent.db")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);

    let garbage = dir.path().join("garbage.db");
    std::fs::write(&garbage, b"not an sqlite database ".repeat(64)).unwrap();
    let err = inspect(&garbage).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
}
