mod common;

use axum::http::{Method, StatusCode};
use common::{send, sqlite_app};
use serde_json::json;

#[tokio::test]
async fn add_task_then_list_shows_it() {
    let app = sqlite_app();

    let (status, task) = send(
        &app,
        Method::POST,
        "/tasks",
        Some(json!({ "description": "Test Task 1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["description"], "Test Task 1");
    assert_eq!(task["completed"], false);

    let (status, list) = send(&app, Method::GET, "/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0], task);
}

#[tokio::test]
async fn create_without_description_returns_400() {
    let app = sqlite_app();

    let (status, body) = send(&app, Method::POST, "/tasks", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Description is required");
}

#[tokio::test]
async fn complete_marks_task_completed() {
    let app = sqlite_app();
    let (_, task) = send(
        &app,
        Method::POST,
        "/tasks",
        Some(json!({ "description": "Task to Complete" })),
    )
    .await;
    let id = task["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::POST, &format!("/tasks/{id}/complete"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], true);

    let (_, fetched) = send(&app, Method::GET, &format!("/tasks/{id}"), None).await;
    assert_eq!(fetched["completed"], true);

    let (status, body) = send(&app, Method::POST, "/tasks/999/complete", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");
}

#[tokio::test]
async fn update_task_fields() {
    let app = sqlite_app();
    send(&app, Method::POST, "/tasks", Some(json!({ "description": "draft" }))).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/tasks/1",
        Some(json!({ "description": "final", "completed": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "final");
    assert_eq!(body["completed"], true);

    let (status, _) =
        send(&app, Method::PUT, "/tasks/1", Some(json!({ "completed": "yes" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_task_removes_it() {
    let app = sqlite_app();
    send(
        &app,
        Method::POST,
        "/tasks",
        Some(json!({ "description": "Task to Delete" })),
    )
    .await;

    let (status, _) = send(&app, Method::DELETE, "/tasks/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send(&app, Method::GET, "/tasks", None).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, _) = send(&app, Method::DELETE, "/tasks/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
