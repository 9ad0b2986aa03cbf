mod common;

use axum::http::{Method, StatusCode};
use common::{authed_request, TestApp};
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

#[tokio::test]
async fn test_access_is_owner_or_member_only() {
    let app = TestApp::new().await;
    let ana = app.register("Ana", "ana@example.com", "supersecret1").await;
    let ben = app.register("Ben", "ben@example.com", "supersecret1").await;
    let eve = app.register("Eve", "eve@example.com", "supersecret1").await;

    let res = app.router.clone().oneshot(authed_request(
        Method::POST, "/api/v1/projects", &ana,
        Some(json!({"name": "Apollo"})),
    )).await.unwrap();
    let project_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/members", project_id), &ana,
        Some(json!({"email": "ben@example.com"})),
    )).await.unwrap();

    let access = &app.state.access_control;

    // Owner and member have access, the stranger does not
    assert!(access.has_access(&project_id, &ana.user_id).await.unwrap());
    assert!(access.has_access(&project_id, &ben.user_id).await.unwrap());
    assert!(!access.has_access(&project_id, &eve.user_id).await.unwrap());

    // Ownership is stricter than access
    assert!(access.has_ownership(&project_id, &ana.user_id).await.unwrap());
    assert!(!access.has_ownership(&project_id, &ben.user_id).await.unwrap());

    // A project that does not exist grants nothing
    assert!(!access.has_access("no-such-project", &ana.user_id).await.unwrap());
    assert!(!access.has_ownership("no-such-project", &ana.user_id).await.unwrap());
}

#[tokio::test]
async fn test_not_found_versus_access_denied_mapping() {
    let app = TestApp::new().await;
    let ana = app.register("Ana", "ana@example.com", "supersecret1").await;
    let eve = app.register("Eve", "eve@example.com", "supersecret1").await;

    let res = app.router.clone().oneshot(authed_request(
        Method::POST, "/api/v1/projects", &ana,
        Some(json!({"name": "Apollo"})),
    )).await.unwrap();
    let project_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    // Existing project, no membership: 403 with a machine-readable code
    let res = app.router.clone().oneshot(authed_request(
        Method::GET, &format!("/api/v1/projects/{}/tasks", project_id), &eve, None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(parse_body(res).await["error_code"], "ACCESS_DENIED");

    // Missing project: 404, even for the same caller
    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/projects/no-such-project/tasks", &eve, None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(parse_body(res).await["error_code"], "NOT_FOUND");

    // Member roles do not unlock owner-only administration
    app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/members", project_id), &ana,
        Some(json!({"email": "eve@example.com", "role": "admin"})),
    )).await.unwrap();

    let res = app.router.clone().oneshot(authed_request(
        Method::DELETE, &format!("/api/v1/projects/{}", project_id), &eve, None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
