use axum::{extract::{Path, Query, State}, response::IntoResponse};
use chrono::Utc;
use crate::api::dtos::responses::success;
use crate::api::extractors::auth::AuthUser;
use crate::api::pagination::{PageMeta, PaginationParams};
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let notifications = state.notification_repo.list_by_user(&user.id, params.per_page(), params.offset()).await?;
    let total = state.notification_repo.count_by_user(&user.id).await?;
    let unread_count = state.notification_repo.unread_count(&user.id).await?;

    Ok(success(json!({
        "notifications": notifications,
        "unread_count": unread_count,
        "pagination": PageMeta::new(&params, total),
    })))
}

pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let count = state.notification_repo.unread_count(&user.id).await?;
    Ok(success(json!({ "unread_count": count })))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let matched = state.notification_repo.mark_read(&notification_id, &user.id, Utc::now()).await?;
    if !matched {
        return Err(AppError::NotFound("Notification".into()));
    }

    Ok(success(json!({ "message": "Notification marked as read" })))
}

pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.notification_repo.mark_all_read(&user.id, Utc::now()).await?;

    debug!("Marked {} notifications read for user {}", updated, user.id);

    Ok(success(json!({ "message": "All notifications marked as read" })))
}
