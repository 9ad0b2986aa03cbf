mod common;

use axum::http::{Method, StatusCode};
use common::{authed_request, AuthHeaders, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        panic!("Response body is empty. Status: {}", status);
    }
    match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => panic!("Failed to parse JSON: {:?}. Status: {}. Body: {:?}", e, status, String::from_utf8_lossy(&bytes))
    }
}

async fn create_project(app: &TestApp, auth: &AuthHeaders, name: &str) -> String {
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, "/api/v1/projects", auth,
        Some(json!({"name": name})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_message_threading() {
    let app = TestApp::new().await;
    let ana = app.register("Ana", "ana@example.com", "supersecret1").await;
    let ben = app.register("Ben", "ben@example.com", "supersecret1").await;
    let project_id = create_project(&app, &ana, "Apollo").await;

    app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/members", project_id), &ana,
        Some(json!({"email": "ben@example.com"})),
    )).await.unwrap();

    // 1. Root message
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/messages", project_id), &ana,
        Some(json!({"content": "Kickoff on Monday"})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let root = parse_body(res).await;
    assert_eq!(root["user_name"], "Ana");
    assert_eq!(root["parent_id"], Value::Null);
    let root_id = root["id"].as_str().unwrap().to_string();

    // 2. Threaded reply from a member
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/messages", project_id), &ben,
        Some(json!({"content": "Works for me", "parent_id": root_id})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let reply = parse_body(res).await;
    assert_eq!(reply["parent_id"], root_id.as_str());

    // 3. Listing is oldest-first and carries author names
    let res = app.router.clone().oneshot(authed_request(
        Method::GET, &format!("/api/v1/projects/{}/messages", project_id), &ana, None,
    )).await.unwrap();
    let body = parse_body(res).await;
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["content"], "Kickoff on Monday");
    assert_eq!(messages[1]["content"], "Works for me");
    assert_eq!(messages[1]["user_name"], "Ben");
    assert_eq!(body["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_message_parent_must_share_project() {
    let app = TestApp::new().await;
    let ana = app.register("Ana", "ana@example.com", "supersecret1").await;
    let project_a = create_project(&app, &ana, "Apollo").await;
    let project_b = create_project(&app, &ana, "Gemini").await;

    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/messages", project_a), &ana,
        Some(json!({"content": "Apollo thread"})),
    )).await.unwrap();
    let foreign_parent = parse_body(res).await["id"].as_str().unwrap().to_string();

    // 1. Parent from another project is rejected
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/messages", project_b), &ana,
        Some(json!({"content": "Crossed wires", "parent_id": foreign_parent})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["error_code"], "VALIDATION_ERROR");

    // 2. Unknown parent
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/messages", project_b), &ana,
        Some(json!({"content": "Orphan", "parent_id": "no-such-message"})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // 3. Empty content
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/messages", project_b), &ana,
        Some(json!({"content": "  "})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_messages_require_membership() {
    let app = TestApp::new().await;
    let ana = app.register("Ana", "ana@example.com", "supersecret1").await;
    let eve = app.register("Eve", "eve@example.com", "supersecret1").await;
    let project_id = create_project(&app, &ana, "Apollo").await;

    let res = app.router.clone().oneshot(authed_request(
        Method::GET, &format!("/api/v1/projects/{}/messages", project_id), &eve, None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/messages", project_id), &eve,
        Some(json!({"content": "Let me in"})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
