// Integration tests for `UsersClient` using wiremock.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskboard_api::{
    BackgroundType, BoardRecord, Error, NewUserRecord, RecordId, TransportConfig, UsersClient,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, UsersClient) {
    let server = MockServer::start().await;
    let client = UsersClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn work_board() -> serde_json::Value {
    json!({
        "id": "1",
        "title": "Work",
        "background": "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400",
        "backgroundType": "image",
        "isStarred": true,
        "isClosed": false,
        "createdAt": "2025-03-01T10:00:00.000Z",
        "lists": [
            { "id": "L1", "title": "Todo", "tasks": [
                { "id": "T1", "title": "Write docs", "isCompleted": false }
            ]}
        ]
    })
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_user_with_boards() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "username": "ada",
            "email": "ada@example.com",
            "password": "Secret1!x",
            "created_at": "2025-01-01T00:00:00.000Z",
            "boards": [work_board()]
        })))
        .mount(&server)
        .await;

    let user = client.get_user("7").await.unwrap();

    assert_eq!(user.id, RecordId::Number(7));
    assert_eq!(user.username, "ada");
    let boards = user.boards.unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].background_type, BackgroundType::Image);
    assert!(boards[0].is_starred);
    let lists = boards[0].lists.as_ref().unwrap();
    assert_eq!(lists[0].tasks.as_ref().unwrap()[0].title, "Write docs");
}

#[tokio::test]
async fn test_list_users() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "username": "ada", "email": "ada@example.com", "password": "x" },
            { "id": "b2", "username": "grace", "email": "grace@example.com", "password": "y" }
        ])))
        .mount(&server)
        .await;

    let users = client.list_users().await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[1].id, RecordId::Text("b2".into()));
    assert_eq!(users[1].email, "grace@example.com");
}

#[tokio::test]
async fn test_create_user_posts_expected_body() {
    let (server, client) = setup().await;

    let expected = json!({
        "username": "ada_l",
        "email": "ada@example.com",
        "password": "Abcdefg1!",
        "created_at": "2025-01-01T00:00:00.000Z"
    });

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 12,
            "username": "ada_l",
            "email": "ada@example.com",
            "password": "Abcdefg1!",
            "created_at": "2025-01-01T00:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create_user(&NewUserRecord {
            username: "ada_l".into(),
            email: "ada@example.com".into(),
            password: "Abcdefg1!".into(),
            created_at: "2025-01-01T00:00:00.000Z".into(),
        })
        .await
        .unwrap();

    assert_eq!(created.id.to_string(), "12");
}

#[tokio::test]
async fn test_patch_boards_sends_whole_collection() {
    let (server, client) = setup().await;

    let board: BoardRecord = serde_json::from_value(work_board()).unwrap();

    Mock::given(method("PATCH"))
        .and(path("/users/7"))
        .and(body_json(json!({ "boards": [work_board()] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "username": "ada",
            "email": "ada@example.com",
            "boards": [work_board()]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client.patch_boards("7", vec![board]).await.unwrap();
    assert_eq!(updated.boards.unwrap().len(), 1);
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_user_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client.get_user("404").await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got {err:?}");
}

#[tokio::test]
async fn test_server_error_keeps_status_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/users/7"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db locked"))
        .mount(&server)
        .await;

    let err = client.patch_boards("7", Vec::new()).await.unwrap_err();
    match err {
        Error::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "db locked");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.list_users().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { ref body, .. } if body.contains("oops")));
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    // Nothing listens on port 9 (discard) in the test environment.
    let client = UsersClient::from_reqwest("http://127.0.0.1:9", reqwest::Client::new()).unwrap();
    let err = client.list_users().await.unwrap_err();
    assert!(err.is_transient(), "expected transient error, got {err:?}");
}

#[tokio::test]
async fn test_slow_response_reports_configured_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let transport = TransportConfig::default().with_timeout(Duration::from_secs(1));
    let client = UsersClient::new(server.uri().parse().unwrap(), &transport).unwrap();

    let err = client.list_users().await.unwrap_err();
    assert!(
        matches!(err, Error::Timeout { timeout_secs: 1 }),
        "expected timeout, got {err:?}"
    );
    assert_eq!(err.to_string(), "Request timed out after 1s");
    assert!(err.is_transient());
}
