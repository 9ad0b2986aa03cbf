use crate::domain::models::{
    auth::RefreshTokenRecord,
    dashboard::{DayCount, StatusCount},
    message::{Message, MessageWithAuthor},
    notification::{Notification, NotificationView},
    project::Project,
    project_member::{MemberProfile, ProjectMember},
    task::{Task, TaskWithAssignee},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: &Project) -> Result<Project, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Project>, AppError>;
    /// Owned plus member projects, de-duplicated.
    async fn list_accessible(&self, user_id: &str) -> Result<Vec<Project>, AppError>;
    async fn accessible_project_ids(&self, user_id: &str) -> Result<Vec<String>, AppError>;
    async fn update(&self, project: &Project) -> Result<Project, AppError>;
    /// Deletes the project and everything hanging off it, in one transaction:
    /// members, then tasks, then messages, then related notifications, then
    /// the project row itself.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    /// Single EXISTS query covering both the owner and the membership case.
    async fn has_access(&self, project_id: &str, user_id: &str) -> Result<bool, AppError>;
    async fn has_ownership(&self, project_id: &str, user_id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ProjectMemberRepository: Send + Sync {
    async fn add(&self, member: &ProjectMember) -> Result<ProjectMember, AppError>;
    async fn find(&self, project_id: &str, user_id: &str) -> Result<Option<ProjectMember>, AppError>;
    async fn list_with_users(&self, project_id: &str) -> Result<Vec<MemberProfile>, AppError>;
    async fn remove(&self, project_id: &str, user_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: &Task) -> Result<Task, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Task>, AppError>;
    async fn list_by_project(&self, project_id: &str, limit: i64, offset: i64) -> Result<Vec<TaskWithAssignee>, AppError>;
    async fn count_by_project(&self, project_id: &str) -> Result<i64, AppError>;
    async fn update(&self, task: &Task) -> Result<Task, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    /// Assigned, not-done tasks with a due date inside [from, until].
    async fn find_due_between(&self, from: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<Task>, AppError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> Result<Message, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Message>, AppError>;
    async fn list_by_project(&self, project_id: &str, limit: i64, offset: i64) -> Result<Vec<MessageWithAuthor>, AppError>;
    async fn count_by_project(&self, project_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError>;
    async fn list_by_user(&self, user_id: &str, limit: i64, offset: i64) -> Result<Vec<NotificationView>, AppError>;
    async fn count_by_user(&self, user_id: &str) -> Result<i64, AppError>;
    async fn unread_count(&self, user_id: &str) -> Result<i64, AppError>;
    /// Returns false when no notification with that id belongs to the user.
    /// Marking an already-read notification again is a successful no-op.
    async fn mark_read(&self, id: &str, user_id: &str, read_at: DateTime<Utc>) -> Result<bool, AppError>;
    async fn mark_all_read(&self, user_id: &str, read_at: DateTime<Utc>) -> Result<u64, AppError>;
    async fn has_unread_for_task(&self, user_id: &str, task_id: &str, kind: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn count_tasks_in_projects(&self, project_ids: &[String]) -> Result<i64, AppError>;
    /// (total, pending, completed) for tasks assigned to the user.
    async fn my_task_counts(&self, user_id: &str) -> Result<(i64, i64, i64), AppError>;
    async fn status_counts_in_projects(&self, project_ids: &[String]) -> Result<Vec<StatusCount>, AppError>;
    async fn count_tasks_created_since(&self, project_ids: &[String], since: DateTime<Utc>) -> Result<i64, AppError>;
    async fn count_messages_created_since(&self, project_ids: &[String], since: DateTime<Utc>) -> Result<i64, AppError>;
    async fn upcoming_tasks(&self, user_id: &str, from: DateTime<Utc>, until: DateTime<Utc>, limit: i64) -> Result<Vec<Task>, AppError>;
    async fn recent_projects(&self, user_id: &str, limit: i64) -> Result<Vec<Project>, AppError>;
    async fn status_counts_for_project(&self, project_id: &str) -> Result<Vec<StatusCount>, AppError>;
    async fn member_count(&self, project_id: &str) -> Result<i64, AppError>;
    async fn daily_task_counts(&self, project_ids: &[String], start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<DayCount>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: &str) -> Result<(), AppError>;
}
