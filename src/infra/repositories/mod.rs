pub mod sqlite_user_repo;
pub mod sqlite_project_repo;
pub mod sqlite_member_repo;
pub mod sqlite_task_repo;
pub mod sqlite_message_repo;
pub mod sqlite_notification_repo;
pub mod sqlite_dashboard_repo;
pub mod sqlite_auth_repo;

pub mod postgres_user_repo;
pub mod postgres_project_repo;
pub mod postgres_member_repo;
pub mod postgres_task_repo;
pub mod postgres_message_repo;
pub mod postgres_notification_repo;
pub mod postgres_dashboard_repo;
pub mod postgres_auth_repo;
