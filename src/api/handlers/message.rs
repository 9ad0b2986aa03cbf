use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::CreateMessageRequest;
use crate::api::dtos::responses::{created, success};
use crate::api::extractors::auth::AuthUser;
use crate::api::pagination::{PageMeta, PaginationParams};
use crate::api::validation::FieldErrors;
use crate::domain::models::message::Message;
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    state.access_control.require_access(&project_id, &user.id).await?;

    let messages = state.message_repo.list_by_project(&project_id, params.per_page(), params.offset()).await?;
    let total = state.message_repo.count_by_project(&project_id).await?;

    Ok(success(json!({
        "messages": messages,
        "pagination": PageMeta::new(&params, total),
    })))
}

pub async fn create_message(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(payload): Json<CreateMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.access_control.require_access(&project_id, &user.id).await?;

    let mut errors = FieldErrors::new();
    errors.require_non_empty("content", &payload.content);
    errors.into_result()?;

    // A reply must thread onto a message in the same project.
    if let Some(ref parent_id) = payload.parent_id {
        let parent = state.message_repo.find_by_id(parent_id).await?
            .ok_or(AppError::NotFound("Parent message".into()))?;
        if parent.project_id != project_id {
            return Err(AppError::Validation("parent_id must reference a message in the same project".into()));
        }
    }

    let message = Message::new(
        project_id,
        user.id.clone(),
        payload.content.trim().to_string(),
        payload.parent_id,
    );
    let created_message = state.message_repo.create(&message).await?;

    let author = state.user_repo.find_by_id(&user.id).await?;

    info!("Created message {} in project {}", created_message.id, created_message.project_id);

    Ok(created(json!({
        "id": created_message.id,
        "project_id": created_message.project_id,
        "user_id": created_message.user_id,
        "user_name": author.map(|u| u.name),
        "content": created_message.content,
        "parent_id": created_message.parent_id,
        "created_at": created_message.created_at,
    })))
}
