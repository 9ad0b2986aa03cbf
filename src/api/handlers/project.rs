use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateProjectRequest, UpdateProjectRequest};
use crate::api::dtos::responses::{created, success};
use crate::api::extractors::auth::AuthUser;
use crate::api::validation::FieldErrors;
use crate::domain::models::project::Project;
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

fn project_json(project: &Project, user_id: &str) -> serde_json::Value {
    json!({
        "id": project.id,
        "name": project.name,
        "description": project.description,
        "owner_id": project.owner_id,
        "is_owner": project.owner_id == user_id,
        "created_at": project.created_at,
    })
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let projects = state.project_repo.list_accessible(&user.id).await?;
    let payload: Vec<_> = projects.iter().map(|p| project_json(p, &user.id)).collect();

    Ok(success(json!({ "projects": payload })))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut errors = FieldErrors::new();
    errors.require_non_empty("name", &payload.name);
    errors.into_result()?;

    let description = payload.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
    let project = Project::new(payload.name.trim().to_string(), description, user.id.clone());
    let created_project = state.project_repo.create(&project).await?;

    info!("Created project {} for user {}", created_project.id, user.id);

    Ok(created(project_json(&created_project, &user.id)))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.access_control.require_access(&project_id, &user.id).await?;

    let project = state.project_repo.find_by_id(&project_id).await?
        .ok_or(AppError::NotFound("Project".into()))?;

    Ok(success(project_json(&project, &user.id)))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.access_control.require_ownership(&project_id, &user.id).await?;

    let mut project = state.project_repo.find_by_id(&project_id).await?
        .ok_or(AppError::NotFound("Project".into()))?;

    if let Some(name) = payload.name {
        let mut errors = FieldErrors::new();
        errors.require_non_empty("name", &name);
        errors.into_result()?;
        project.name = name.trim().to_string();
    }
    if let Some(description) = payload.description {
        let trimmed = description.trim().to_string();
        project.description = if trimmed.is_empty() { None } else { Some(trimmed) };
    }

    let updated = state.project_repo.update(&project).await?;

    info!("Updated project {}", updated.id);

    Ok(success(project_json(&updated, &user.id)))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.access_control.require_ownership(&project_id, &user.id).await?;

    state.project_repo.delete(&project_id).await?;

    info!("Deleted project {} and its dependents", project_id);

    Ok(success(json!({ "message": "Project deleted" })))
}
