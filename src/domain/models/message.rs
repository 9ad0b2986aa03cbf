use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Message {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub content: String,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(project_id: String, user_id: String, content: String, parent_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id,
            user_id,
            content,
            parent_id,
            created_at: Utc::now(),
        }
    }
}

/// Message row joined with the author's name, for listings.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct MessageWithAuthor {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
