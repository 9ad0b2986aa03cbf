use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const TYPE_TASK_ASSIGNED: &str = "task_assigned";
pub const TYPE_TASK_STATUS_CHANGED: &str = "task_status_changed";
pub const TYPE_TASK_DUE_SOON: &str = "task_due_soon";
pub const TYPE_PROJECT_MEMBER_ADDED: &str = "project_member_added";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub related_project_id: Option<String>,
    pub related_task_id: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

pub struct NewNotificationParams {
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub related_project_id: Option<String>,
    pub related_task_id: Option<String>,
}

impl Notification {
    pub fn new(params: NewNotificationParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            kind: params.kind,
            title: params.title,
            message: params.message,
            related_project_id: params.related_project_id,
            related_task_id: params.related_task_id,
            is_read: false,
            created_at: Utc::now(),
            read_at: None,
        }
    }
}

/// Notification row joined with the related project/task names, for listings.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct NotificationView {
    pub id: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub related_project_id: Option<String>,
    pub related_task_id: Option<String>,
    pub project_name: Option<String>,
    pub task_title: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}
