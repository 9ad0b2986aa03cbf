use axum::{extract::{Query, State}, response::IntoResponse};
use crate::api::dtos::requests::TimelineParams;
use crate::api::dtos::responses::success;
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;

const RECENT_PROJECTS_LIMIT: i64 = 6;
const MAX_TIMELINE_DAYS: i64 = 90;

pub async fn stats(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let overview = state.dashboard_service.stats(&user.id).await?;

    Ok(success(json!({
        "statistics": overview.statistics,
        "upcoming_deadlines": overview.upcoming_deadlines,
    })))
}

pub async fn recent_projects(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let projects = state.dashboard_service.recent_projects(&user.id, RECENT_PROJECTS_LIMIT).await?;

    Ok(success(json!({ "projects": projects })))
}

pub async fn activity_timeline(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<TimelineParams>,
) -> Result<impl IntoResponse, AppError> {
    let days = params.days.unwrap_or(7);
    if !(1..=MAX_TIMELINE_DAYS).contains(&days) {
        return Err(AppError::Validation(format!("days must be between 1 and {}", MAX_TIMELINE_DAYS)));
    }

    let timeline = state.dashboard_service.activity_timeline(&user.id, days).await?;

    Ok(success(json!({ "timeline": timeline })))
}
