use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, dashboard, health, member, message, notification, project, task};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Projects
        .route("/api/v1/projects", get(project::list_projects).post(project::create_project))
        .route("/api/v1/projects/{project_id}", get(project::get_project).put(project::update_project).delete(project::delete_project))

        // Members
        .route("/api/v1/projects/{project_id}/members", get(member::list_members).post(member::add_member))
        .route("/api/v1/projects/{project_id}/members/{user_id}", delete(member::remove_member))

        // Tasks
        .route("/api/v1/projects/{project_id}/tasks", get(task::list_tasks).post(task::create_task))
        .route("/api/v1/tasks/{task_id}", get(task::get_task).patch(task::update_task).delete(task::delete_task))

        // Messages
        .route("/api/v1/projects/{project_id}/messages", get(message::list_messages).post(message::create_message))

        // Notifications
        .route("/api/v1/notifications", get(notification::list_notifications))
        .route("/api/v1/notifications/unread-count", get(notification::unread_count))
        .route("/api/v1/notifications/{notification_id}/read", patch(notification::mark_read))
        .route("/api/v1/notifications/read-all", patch(notification::mark_all_read))

        // Dashboard
        .route("/api/v1/dashboard/stats", get(dashboard::stats))
        .route("/api/v1/dashboard/recent-projects", get(dashboard::recent_projects))
        .route("/api/v1/dashboard/activity-timeline", get(dashboard::activity_timeline))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
