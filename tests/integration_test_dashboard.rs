mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
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
async fn test_dashboard_is_all_zero_for_new_users() {
    let app = TestApp::new().await;
    let ana = app.register("Ana", "ana@example.com", "supersecret1").await;

    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/dashboard/stats", &ana, None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let stats = &body["statistics"];
    assert_eq!(stats["total_projects"], 0);
    assert_eq!(stats["total_tasks"], 0);
    assert_eq!(stats["my_tasks"]["total"], 0);
    assert_eq!(stats["my_tasks"]["pending"], 0);
    assert_eq!(stats["my_tasks"]["completed"], 0);
    assert_eq!(stats["tasks_by_status"]["todo"], 0);
    assert_eq!(stats["tasks_by_status"]["in_progress"], 0);
    assert_eq!(stats["tasks_by_status"]["done"], 0);
    assert_eq!(stats["recent_activity"]["tasks_created"], 0);
    assert_eq!(stats["recent_activity"]["messages_sent"], 0);
    assert_eq!(stats["unread_notifications"], 0);
    assert!(body["upcoming_deadlines"].as_array().unwrap().is_empty());

    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/dashboard/recent-projects", &ana, None,
    )).await.unwrap();
    assert!(parse_body(res).await["projects"].as_array().unwrap().is_empty());

    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/dashboard/activity-timeline?days=7", &ana, None,
    )).await.unwrap();
    let timeline = parse_body(res).await["timeline"].as_array().unwrap().clone();
    assert_eq!(timeline.len(), 7);
    assert!(timeline.iter().all(|e| e["tasks_created"] == 0));
}

#[tokio::test]
async fn test_dashboard_reflects_assignment_scenario() {
    let app = TestApp::new().await;
    let ana = app.register("Ana", "ana@example.com", "supersecret1").await;
    let ben = app.register("Ben", "ben@example.com", "supersecret1").await;

    // Ana owns a project, Ben joins, Ben creates a task assigned to Ana
    let project_id = create_project(&app, &ana, "Apollo").await;
    app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/members", project_id), &ana,
        Some(json!({"email": "ben@example.com"})),
    )).await.unwrap();

    let due = (Utc::now() + Duration::days(3)).to_rfc3339();
    let res = app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/tasks", project_id), &ben,
        Some(json!({"title": "Inspect heat shield", "assignee_id": ana.user_id, "due_date": due})),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Ana's dashboard
    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/dashboard/stats", &ana, None,
    )).await.unwrap();
    let body = parse_body(res).await;
    let stats = &body["statistics"];
    assert_eq!(stats["total_projects"], 1);
    assert_eq!(stats["total_tasks"], 1);
    assert_eq!(stats["my_tasks"]["total"], 1);
    assert_eq!(stats["my_tasks"]["pending"], 1);
    assert_eq!(stats["my_tasks"]["completed"], 0);
    assert_eq!(stats["tasks_by_status"]["todo"], 1);
    assert_eq!(stats["tasks_by_status"]["in_progress"], 0);
    assert_eq!(stats["tasks_by_status"]["done"], 0);
    assert_eq!(stats["recent_activity"]["tasks_created"], 1);
    assert_eq!(stats["unread_notifications"], 1);

    let deadlines = body["upcoming_deadlines"].as_array().unwrap();
    assert_eq!(deadlines.len(), 1);
    assert_eq!(deadlines[0]["title"], "Inspect heat shield");

    // Exactly one unread task_assigned notification backs that count
    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/notifications", &ana, None,
    )).await.unwrap();
    let notifications = parse_body(res).await["notifications"].as_array().unwrap().clone();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], "task_assigned");
    assert_eq!(notifications[0]["is_read"], false);

    // Ben shares the project but owns no tasks
    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/dashboard/stats", &ben, None,
    )).await.unwrap();
    let stats = parse_body(res).await["statistics"].clone();
    assert_eq!(stats["total_projects"], 1);
    assert_eq!(stats["total_tasks"], 1);
    assert_eq!(stats["my_tasks"]["total"], 0);

    // Completing the task moves it between buckets
    // (done by Ana herself, so no extra notification lands)
    let res = app.router.clone().oneshot(authed_request(
        Method::GET, &format!("/api/v1/projects/{}/tasks", project_id), &ana, None,
    )).await.unwrap();
    let task_id = parse_body(res).await["tasks"][0]["id"].as_str().unwrap().to_string();

    app.router.clone().oneshot(authed_request(
        Method::PATCH, &format!("/api/v1/tasks/{}", task_id), &ana,
        Some(json!({"status": "done"})),
    )).await.unwrap();

    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/dashboard/stats", &ana, None,
    )).await.unwrap();
    let body = parse_body(res).await;
    let stats = &body["statistics"];
    assert_eq!(stats["my_tasks"]["pending"], 0);
    assert_eq!(stats["my_tasks"]["completed"], 1);
    assert_eq!(stats["tasks_by_status"]["done"], 1);
    assert_eq!(stats["unread_notifications"], 1);
    // Done tasks drop out of the deadline list
    assert!(body["upcoming_deadlines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recent_projects_counts_owner_in_members() {
    let app = TestApp::new().await;
    let ana = app.register("Ana", "ana@example.com", "supersecret1").await;
    let ben = app.register("Ben", "ben@example.com", "supersecret1").await;
    let project_id = create_project(&app, &ana, "Apollo").await;

    app.router.clone().oneshot(authed_request(
        Method::POST, &format!("/api/v1/projects/{}/members", project_id), &ana,
        Some(json!({"email": "ben@example.com"})),
    )).await.unwrap();

    for (title, status) in [("Plan", "todo"), ("Build", "done")] {
        app.router.clone().oneshot(authed_request(
            Method::POST, &format!("/api/v1/projects/{}/tasks", project_id), &ana,
            Some(json!({"title": title, "status": status})),
        )).await.unwrap();
    }

    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/dashboard/recent-projects", &ana, None,
    )).await.unwrap();
    let projects = parse_body(res).await["projects"].as_array().unwrap().clone();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["member_count"], 2); // one member row plus the owner
    assert_eq!(projects[0]["is_owner"], true);
    assert_eq!(projects[0]["task_stats"]["todo"], 1);
    assert_eq!(projects[0]["task_stats"]["done"], 1);
    assert_eq!(projects[0]["task_stats"]["in_progress"], 0);

    // Same listing from the member's side
    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/dashboard/recent-projects", &ben, None,
    )).await.unwrap();
    let projects = parse_body(res).await["projects"].as_array().unwrap().clone();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["is_owner"], false);
}

#[tokio::test]
async fn test_activity_timeline_is_dense() {
    let app = TestApp::new().await;
    let ana = app.register("Ana", "ana@example.com", "supersecret1").await;
    let project_id = create_project(&app, &ana, "Apollo").await;

    for i in 0..2 {
        app.router.clone().oneshot(authed_request(
            Method::POST, &format!("/api/v1/projects/{}/tasks", project_id), &ana,
            Some(json!({"title": format!("Today {}", i)})),
        )).await.unwrap();
    }

    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/dashboard/activity-timeline?days=7", &ana, None,
    )).await.unwrap();
    let timeline = parse_body(res).await["timeline"].as_array().unwrap().clone();
    assert_eq!(timeline.len(), 7);
    // Trailing window: the last entry is today, both tasks land there
    assert_eq!(timeline[6]["tasks_created"], 2);
    assert!(timeline[..6].iter().all(|e| e["tasks_created"] == 0));

    // Entries are contiguous calendar days
    let dates: Vec<&str> = timeline.iter().map(|e| e["date"].as_str().unwrap()).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
    assert_eq!(dates.len(), 7);

    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/dashboard/activity-timeline?days=1", &ana, None,
    )).await.unwrap();
    assert_eq!(parse_body(res).await["timeline"].as_array().unwrap().len(), 1);

    // Window bounds are validated
    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/dashboard/activity-timeline?days=0", &ana, None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.router.clone().oneshot(authed_request(
        Method::GET, "/api/v1/dashboard/activity-timeline?days=365", &ana, None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
