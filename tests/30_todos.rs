mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use common::{send, TestServer};

async fn board_for(server: &TestServer, uid: &str) -> Result<String> {
    let (status, board) = send(
        server
            .request(Method::POST, "/api/boards", Some(uid))
            .json(&json!({"title": format!("{}'s board", uid)})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(board["id"].as_str().unwrap_or_default().to_string())
}

async fn create_todo(server: &TestServer, uid: &str, body: Value) -> Result<Value> {
    let (status, todo) = send(server.request(Method::POST, "/api/todos", Some(uid)).json(&body)).await?;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", todo);
    Ok(todo)
}

#[tokio::test]
async fn create_validates_fields_before_the_board() -> Result<()> {
    let server = TestServer::start().await?;

    let cases = [
        (json!({"title": "", "boardId": "x"}), "Todo title is required"),
        (json!({"title": "Ship"}), "Board ID is required"),
        (json!({"title": "Ship", "boardId": "  "}), "Board ID is required"),
    ];
    for (body, message) in cases {
        let (status, err) = send(server.request(Method::POST, "/api/todos", Some("alice")).json(&body)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], message);
    }

    let board_id = board_for(&server, "alice").await?;
    let bad_priority = json!({"title": "Ship", "boardId": board_id, "priority": "urgent"});
    let (status, _) = send(server.request(Method::POST, "/api/todos", Some("alice")).json(&bad_priority)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bad_date = json!({"title": "Ship", "boardId": board_id, "dueDate": "next tuesday"});
    let (status, _) = send(server.request(Method::POST, "/api/todos", Some("alice")).json(&bad_date)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn create_on_foreign_board_persists_nothing() -> Result<()> {
    let server = TestServer::start().await?;
    let bob_board = board_for(&server, "bob").await?;

    let body = json!({"title": "Sneaky", "boardId": bob_board});
    let (status, err) = send(server.request(Method::POST, "/api/todos", Some("alice")).json(&body)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "Board not found");

    let (status, _) = send(server.request(Method::POST, "/api/todos", Some("alice")).json(&json!({"title": "x", "boardId": "x"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(server.store.todo_count_for_board(bob_board.parse()?).await, 0);
    Ok(())
}

#[tokio::test]
async fn create_applies_defaults() -> Result<()> {
    let server = TestServer::start().await?;
    let board_id = board_for(&server, "alice").await?;
    let todo = create_todo(&server, "alice", json!({"title": "Ship", "boardId": board_id})).await?;

    assert_eq!(todo["priority"], "medium");
    assert_eq!(todo["completed"], false);
    assert_eq!(todo["description"], "");
    assert!(todo["dueDate"].is_null());
    assert_eq!(todo["boardId"], board_id.as_str());
    assert_eq!(todo["userId"], "alice");
    Ok(())
}

#[tokio::test]
async fn toggle_twice_restores_state() -> Result<()> {
    let server = TestServer::start().await?;
    let board_id = board_for(&server, "alice").await?;
    let todo = create_todo(&server, "alice", json!({"title": "Ship", "boardId": board_id, "priority": "high"})).await?;
    let path = format!("/api/todos/{}/toggle", todo["id"].as_str().unwrap_or_default());

    let (status, once) = send(server.request(Method::PATCH, &path, Some("alice"))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(once["completed"], true);

    let (_, twice) = send(server.request(Method::PATCH, &path, Some("alice"))).await?;
    assert_eq!(twice["completed"], false);
    assert_eq!(twice["title"], "Ship");
    assert_eq!(twice["priority"], "high");

    let (status, _) = send(server.request(Method::PATCH, &path, Some("bob"))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn due_date_can_be_kept_set_or_cleared() -> Result<()> {
    let server = TestServer::start().await?;
    let board_id = board_for(&server, "alice").await?;
    let todo = create_todo(
        &server,
        "alice",
        json!({"title": "Ship", "boardId": board_id, "dueDate": "2026-03-01"}),
    )
    .await?;
    assert_eq!(todo["dueDate"], "2026-03-01T00:00:00Z");
    let path = format!("/api/todos/{}", todo["id"].as_str().unwrap_or_default());

    // Absent: kept
    let (_, kept) = send(server.request(Method::PUT, &path, Some("alice")).json(&json!({"title": "Ship it"}))).await?;
    assert_eq!(kept["title"], "Ship it");
    assert_eq!(kept["dueDate"], "2026-03-01T00:00:00Z");

    // Set
    let (_, moved) = send(
        server
            .request(Method::PUT, &path, Some("alice"))
            .json(&json!({"dueDate": "2026-04-15T09:30:00Z"})),
    )
    .await?;
    assert_eq!(moved["dueDate"], "2026-04-15T09:30:00Z");

    // Null: cleared
    let (_, cleared) = send(server.request(Method::PUT, &path, Some("alice")).json(&json!({"dueDate": null}))).await?;
    assert!(cleared["dueDate"].is_null());
    assert_eq!(cleared["title"], "Ship it");
    Ok(())
}

#[tokio::test]
async fn update_rejects_bad_fields_without_changes() -> Result<()> {
    let server = TestServer::start().await?;
    let board_id = board_for(&server, "alice").await?;
    let todo = create_todo(&server, "alice", json!({"title": "Ship", "boardId": board_id})).await?;
    let path = format!("/api/todos/{}", todo["id"].as_str().unwrap_or_default());

    let body = json!({"title": "Renamed", "priority": "critical"});
    let (status, _) = send(server.request(Method::PUT, &path, Some("alice")).json(&body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, stored) = send(server.request(Method::GET, &path, Some("alice"))).await?;
    assert_eq!(stored["title"], "Ship");

    let (status, updated) = send(
        server
            .request(Method::PUT, &path, Some("alice"))
            .json(&json!({"completed": true, "priority": "low"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["priority"], "low");
    Ok(())
}

#[tokio::test]
async fn list_by_board_is_scoped() -> Result<()> {
    let server = TestServer::start().await?;
    let work = board_for(&server, "alice").await?;
    let (_, home) = send(
        server
            .request(Method::POST, "/api/boards", Some("alice"))
            .json(&json!({"title": "Home"})),
    )
    .await?;
    let home = home["id"].as_str().unwrap_or_default().to_string();

    create_todo(&server, "alice", json!({"title": "a", "boardId": work})).await?;
    create_todo(&server, "alice", json!({"title": "b", "boardId": work})).await?;
    create_todo(&server, "alice", json!({"title": "c", "boardId": home})).await?;

    let (status, listed) = send(server.request(Method::GET, &format!("/api/todos/board/{}", work), Some("alice"))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(2));

    let (status, _) = send(server.request(Method::GET, &format!("/api/todos/board/{}", work), Some("bob"))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_removes_only_that_todo() -> Result<()> {
    let server = TestServer::start().await?;
    let board_id = board_for(&server, "alice").await?;
    let keep = create_todo(&server, "alice", json!({"title": "keep", "boardId": board_id})).await?;
    let doomed = create_todo(&server, "alice", json!({"title": "drop", "boardId": board_id})).await?;
    let path = format!("/api/todos/{}", doomed["id"].as_str().unwrap_or_default());

    let (status, _) = send(server.request(Method::DELETE, &path, Some("bob"))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(server.request(Method::DELETE, &path, Some("alice"))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Todo deleted successfully");

    let (status, _) = send(server.request(Method::DELETE, &path, Some("alice"))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let keep_path = format!("/api/todos/{}", keep["id"].as_str().unwrap_or_default());
    let (status, _) = send(server.request(Method::GET, &keep_path, Some("alice"))).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn foreign_reads_and_updates_are_not_found() -> Result<()> {
    let server = TestServer::start().await?;
    let board_id = board_for(&server, "alice").await?;
    let todo = create_todo(
        &server,
        "alice",
        json!({"title": "Private", "boardId": board_id, "priority": "high"}),
    )
    .await?;
    let path = format!("/api/todos/{}", todo["id"].as_str().unwrap_or_default());

    let (status, err) = send(server.request(Method::GET, &path, Some("bob"))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "Todo not found");

    let hijack = json!({"title": "Mine now", "completed": true, "dueDate": null});
    let (status, err) = send(server.request(Method::PUT, &path, Some("bob")).json(&hijack)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "Todo not found");

    let (status, stored) = send(server.request(Method::GET, &path, Some("alice"))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, todo);
    Ok(())
}
