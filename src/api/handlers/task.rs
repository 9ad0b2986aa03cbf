use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use chrono::Utc;
use crate::api::dtos::requests::{CreateTaskRequest, UpdateTaskRequest};
use crate::api::dtos::responses::{created, success};
use crate::api::extractors::auth::AuthUser;
use crate::api::pagination::{PageMeta, PaginationParams};
use crate::api::validation::{one_of, parse_datetime, FieldErrors};
use crate::domain::models::task::{NewTaskParams, Task, TASK_PRIORITIES, TASK_STATUSES};
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

fn task_json(task: &Task, assignee_name: Option<&str>) -> serde_json::Value {
    json!({
        "id": task.id,
        "project_id": task.project_id,
        "title": task.title,
        "description": task.description,
        "assignee_id": task.assignee_id,
        "assignee_name": assignee_name,
        "due_date": task.due_date,
        "status": task.status,
        "priority": task.priority,
        "created_at": task.created_at,
        "updated_at": task.updated_at,
    })
}

pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    state.access_control.require_access(&project_id, &user.id).await?;

    let tasks = state.task_repo.list_by_project(&project_id, params.per_page(), params.offset()).await?;
    let total = state.task_repo.count_by_project(&project_id).await?;

    Ok(success(json!({
        "tasks": tasks,
        "pagination": PageMeta::new(&params, total),
    })))
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.access_control.require_access(&project_id, &user.id).await?;

    let mut errors = FieldErrors::new();
    errors.require_non_empty("title", &payload.title);
    let status = payload.status.unwrap_or_else(|| "todo".to_string());
    errors.check("status", one_of(&status, TASK_STATUSES), "status must be one of todo, in_progress, done");
    let priority = payload.priority.unwrap_or_else(|| "medium".to_string());
    errors.check("priority", one_of(&priority, TASK_PRIORITIES), "priority must be one of low, medium, high");
    errors.into_result()?;

    let due_date = match payload.due_date.as_deref() {
        Some(raw) => Some(parse_datetime("due_date", raw)?),
        None => None,
    };

    let assignee_name = match payload.assignee_id.as_deref() {
        Some(assignee_id) => {
            let assignee = state.user_repo.find_by_id(assignee_id).await?
                .ok_or(AppError::NotFound("Assignee".into()))?;
            Some(assignee.name)
        }
        None => None,
    };

    let task = Task::new(NewTaskParams {
        project_id,
        title: payload.title.trim().to_string(),
        description: payload.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        assignee_id: payload.assignee_id,
        due_date,
        status,
        priority,
    });
    let created_task = state.task_repo.create(&task).await?;

    if created_task.assignee_id.is_some() {
        state.dispatcher.task_assigned(&created_task).await;
    }

    info!("Created task {} in project {}", created_task.id, created_task.project_id);

    Ok(created(task_json(&created_task, assignee_name.as_deref())))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.task_repo.find_by_id(&task_id).await?
        .ok_or(AppError::NotFound("Task".into()))?;

    state.access_control.require_access(&task.project_id, &user.id).await?;

    let assignee_name = match task.assignee_id.as_deref() {
        Some(assignee_id) => state.user_repo.find_by_id(assignee_id).await?.map(|u| u.name),
        None => None,
    };

    Ok(success(task_json(&task, assignee_name.as_deref())))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(task_id): Path<String>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut task = state.task_repo.find_by_id(&task_id).await?
        .ok_or(AppError::NotFound("Task".into()))?;

    state.access_control.require_access(&task.project_id, &user.id).await?;

    let old_status = task.status.clone();
    let old_assignee = task.assignee_id.clone();

    let mut errors = FieldErrors::new();
    if let Some(ref title) = payload.title {
        errors.require_non_empty("title", title);
    }
    if let Some(ref status) = payload.status {
        errors.check("status", one_of(status, TASK_STATUSES), "status must be one of todo, in_progress, done");
    }
    if let Some(ref priority) = payload.priority {
        errors.check("priority", one_of(priority, TASK_PRIORITIES), "priority must be one of low, medium, high");
    }
    errors.into_result()?;

    if let Some(title) = payload.title {
        task.title = title.trim().to_string();
    }
    if let Some(status) = payload.status {
        task.status = status;
    }
    if let Some(priority) = payload.priority {
        task.priority = priority;
    }
    if let Some(description) = payload.description {
        task.description = description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
    }
    if let Some(assignee_id) = payload.assignee_id {
        if let Some(ref id) = assignee_id {
            state.user_repo.find_by_id(id).await?
                .ok_or(AppError::NotFound("Assignee".into()))?;
        }
        task.assignee_id = assignee_id;
    }
    if let Some(due_date) = payload.due_date {
        task.due_date = match due_date.as_deref() {
            Some(raw) => Some(parse_datetime("due_date", raw)?),
            None => None,
        };
    }

    task.updated_at = Utc::now();
    let updated = state.task_repo.update(&task).await?;

    if updated.status != old_status {
        state.dispatcher.task_status_changed(&updated, &old_status, &user.id).await;
    }
    if updated.assignee_id.is_some() && updated.assignee_id != old_assignee {
        state.dispatcher.task_assigned(&updated).await;
    }

    let assignee_name = match updated.assignee_id.as_deref() {
        Some(assignee_id) => state.user_repo.find_by_id(assignee_id).await?.map(|u| u.name),
        None => None,
    };

    info!("Updated task {}", updated.id);

    Ok(success(task_json(&updated, assignee_name.as_deref())))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.task_repo.find_by_id(&task_id).await?
        .ok_or(AppError::NotFound("Task".into()))?;

    state.access_control.require_access(&task.project_id, &user.id).await?;

    state.task_repo.delete(&task.id).await?;

    info!("Deleted task {}", task.id);

    Ok(success(json!({ "message": "Task deleted" })))
}
