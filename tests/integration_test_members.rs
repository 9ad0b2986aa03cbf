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

async fn create_project(app: &TestApp, auth: &common::AuthHeaders, name: &str) -> String {
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, "/api/v1/projects", auth,
        Some(json!({"name": name})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_member_lifecycle() {
    let app = TestApp::new().await;
    let ana = app.register("Ana", "ana@example.com", "supersecret1").await;
    let ben = app.register("Ben", "ben@example.com", "supersecret1").await;
    let project_id = create_project(&app, &ana, "Apollo").await;

    // 1. Add Ben by email
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/members", project_id), &ana,
        Some(json!({"email": "ben@example.com"})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let member = parse_body(res).await;
    assert_eq!(member["user_id"], ben.user_id.as_str());
    assert_eq!(member["role"], "member");

    // 2. Ben can now read the project
    let res = app.router.clone().oneshot(authed_request(
        Method::GET, &format!("/api/v1/projects/{}", project_id), &ben, None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // 3. Ben got exactly one member-added notification naming the inviter
    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/notifications", &ben, None,
    )).await.unwrap();
    let body = parse_body(res).await;
    let notifications = body["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], "project_member_added");
    assert_eq!(notifications[0]["is_read"], false);
    let message = notifications[0]["message"].as_str().unwrap();
    assert!(message.contains("Ana"));
    assert!(message.contains("Apollo"));

    // 4. Members listing carries the joined user profile
    let res = app.router.clone().oneshot(authed_request(
        Method::GET, &format!("/api/v1/projects/{}/members", project_id), &ben, None,
    )).await.unwrap();
    let body = parse_body(res).await;
    let members = body["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["name"], "Ben");
    assert_eq!(members[0]["email"], "ben@example.com");

    // 5. Adding the same user again is a conflict, not a 500
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/members", project_id), &ana,
        Some(json!({"email": "ben@example.com"})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["error_code"], "CONFLICT");

    // 6. Unknown email
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/members", project_id), &ana,
        Some(json!({"email": "ghost@example.com"})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // 7. Members cannot administer membership
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/members", project_id), &ben,
        Some(json!({"email": "ana@example.com"})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // 8. Remove Ben, access is gone, second removal 404s
    let res = app.router.clone().oneshot(authed_request(
        Method::DELETE, &format!("/api/v1/projects/{}/members/{}", project_id, ben.user_id), &ana, None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(authed_request(
        Method::GET, &format!("/api/v1/projects/{}", project_id), &ben, None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.router.clone().oneshot(authed_request(
        Method::DELETE, &format!("/api/v1/projects/{}/members/{}", project_id, ben.user_id), &ana, None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_member_validation() {
    let app = TestApp::new().await;
    let ana = app.register("Ana", "ana@example.com", "supersecret1").await;
    app.register("Ben", "ben@example.com", "supersecret1").await;
    let project_id = create_project(&app, &ana, "Apollo").await;

    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/members", project_id), &ana,
        Some(json!({"email": "ben@example.com", "role": "superuser"})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert!(body["field_errors"].as_object().unwrap().contains_key("role"));

    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/members", project_id), &ana,
        Some(json!({"email": "not-an-email"})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert!(body["field_errors"].as_object().unwrap().contains_key("email"));

    // A viewer role is accepted
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/members", project_id), &ana,
        Some(json!({"email": "ben@example.com", "role": "viewer"})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(parse_body(res).await["role"], "viewer");
}
