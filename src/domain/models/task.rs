use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const TASK_STATUSES: &[&str] = &["todo", "in_progress", "done"];
pub const TASK_PRIORITIES: &[&str] = &["low", "medium", "high"];

pub const STATUS_DONE: &str = "done";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: String,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewTaskParams {
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: String,
    pub priority: String,
}

impl Task {
    pub fn new(params: NewTaskParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: params.project_id,
            title: params.title,
            description: params.description,
            assignee_id: params.assignee_id,
            due_date: params.due_date,
            status: params.status,
            priority: params.priority,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Task row joined with the assignee's name, for listings.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct TaskWithAssignee {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<String>,
    pub assignee_name: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: String,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
