use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const MEMBER_ROLES: &[&str] = &["owner", "admin", "member", "viewer"];

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ProjectMember {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl ProjectMember {
    pub fn new(project_id: String, user_id: String, role: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id,
            user_id,
            role,
            created_at: Utc::now(),
        }
    }
}

/// Membership row joined with the member's user record, for listings.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct MemberProfile {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}
