use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::AddMemberRequest;
use crate::api::dtos::responses::{created, success};
use crate::api::extractors::auth::AuthUser;
use crate::api::validation::{is_valid_email, one_of, FieldErrors};
use crate::domain::models::project_member::{ProjectMember, MEMBER_ROLES};
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn add_member(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(payload): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.access_control.require_ownership(&project_id, &user.id).await?;

    let mut errors = FieldErrors::new();
    errors.require_non_empty("email", &payload.email);
    if !payload.email.trim().is_empty() {
        errors.check("email", is_valid_email(payload.email.trim()), "email is not a valid address");
    }
    let role = payload.role.unwrap_or_else(|| "member".to_string());
    errors.check("role", one_of(&role, MEMBER_ROLES), "role must be one of owner, admin, member, viewer");
    errors.into_result()?;

    let target = state.user_repo.find_by_email(payload.email.trim()).await?
        .ok_or(AppError::NotFound("User".into()))?;

    if target.id == user.id {
        return Err(AppError::Conflict("Owner is already a member".into()));
    }
    if state.member_repo.find(&project_id, &target.id).await?.is_some() {
        return Err(AppError::Conflict("User is already a member".into()));
    }

    let member = ProjectMember::new(project_id.clone(), target.id.clone(), role);
    // A concurrent duplicate add still trips the unique (project_id, user_id)
    // constraint here and surfaces as a Conflict, not a 500.
    let added = state.member_repo.add(&member).await?;

    let project = state.project_repo.find_by_id(&project_id).await?
        .ok_or(AppError::NotFound("Project".into()))?;
    state.dispatcher.member_added(&project, &target.id, &user.id).await;

    info!("Added user {} to project {} as {}", target.id, project_id, added.role);

    Ok(created(json!({
        "id": added.id,
        "project_id": added.project_id,
        "user_id": added.user_id,
        "name": target.name,
        "email": target.email,
        "role": added.role,
        "created_at": added.created_at,
    })))
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.access_control.require_access(&project_id, &user.id).await?;

    let members = state.member_repo.list_with_users(&project_id).await?;

    Ok(success(json!({ "members": members })))
}

pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path((project_id, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.access_control.require_ownership(&project_id, &user.id).await?;

    state.member_repo.remove(&project_id, &user_id).await?;

    info!("Removed user {} from project {}", user_id, project_id);

    Ok(success(json!({ "message": "Member removed" })))
}
