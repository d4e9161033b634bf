//! HTTP API tests against real database files.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chatview::server::{build_router, AppState};
use chatview::{ChatAccessor, StoreLocator, StoreRegistry};
use rusqlite::Connection;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn app_with_db(dir: &TempDir) -> axum::Router {
    let main = dir.path().join("webui.db");
    let conn = Connection::open(&main).unwrap();
    conn.execute_batch(
        r#"CREATE TABLE chat (id VARCHAR(255) PRIMARY KEY, title TEXT, chat TEXT, created_at BIGINT, updated_at BIGINT);
           INSERT INTO chat VALUES ('old', 'Older', '{"messages":[{"role":"user","content":"a"}]}', 1, 1);
           INSERT INTO chat VALUES ('new', NULL, '[{"role":"user","content":"b"}]', 2, 9);
           INSERT INTO chat VALUES ('bad', 'Broken', '{"messages":', 3, 3);"#,
    )
    .unwrap();

    let empty = dir.path().join("empty.db");
    Connection::open(&empty)
        .unwrap()
        .execute_batch("CREATE TABLE auth (id TEXT)")
        .unwrap();

    build_router(AppState {
        accessor: ChatAccessor::new(StoreLocator::new(StoreRegistry::from_iter([
            ("main", main),
            ("empty", empty),
        ]))),
        default_store: "main".to_string(),
    })
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_list_defaults_to_main() {
    let dir = TempDir::new().unwrap();
    let app = app_with_db(&dir);

    let (status, body) = get(app, "/api/chats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": "new", "title": "Untitled Chat"},
            {"id": "bad", "title": "Broken"},
            {"id": "old", "title": "Older"}
        ])
    );
}

#[tokio::test]
async fn test_list_store_without_chat_table() {
    let dir = TempDir::new().unwrap();
    let app = app_with_db(&dir);

    let (status, body) = get(app, "/api/chats?db=empty").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_detail_ok() {
    let dir = TempDir::new().unwrap();
    let app = app_with_db(&dir);

    let (status, body) = get(app.clone(), "/api/chats/old?db=main").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"title": "Older", "messages": [{"role": "user", "content": "a"}]})
    );

    let (status, body) = get(app, "/api/chats/new").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Untitled Chat");
    assert_eq!(body["messages"][0]["content"], "b");
}

#[tokio::test]
async fn test_detail_errors() {
    let dir = TempDir::new().unwrap();
    let app = app_with_db(&dir);

    let (status, body) = get(app.clone(), "/api/chats/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Chat not found");

    let (status, body) = get(app.clone(), "/api/chats/bad").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("bad"));

    let (status, body) = get(app, "/api/chats/old?db=archive").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid database selected");
}
