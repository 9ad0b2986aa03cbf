use std::sync::Arc;
use crate::domain::ports::{
    AuthRepository, DashboardRepository, MessageRepository, NotificationRepository,
    ProjectMemberRepository, ProjectRepository, TaskRepository, UserRepository,
};
use crate::domain::services::access_control::AccessControl;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::dashboard_service::DashboardService;
use crate::domain::services::notification_service::NotificationDispatcher;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub member_repo: Arc<dyn ProjectMemberRepository>,
    pub task_repo: Arc<dyn TaskRepository>,
    pub message_repo: Arc<dyn MessageRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub dashboard_repo: Arc<dyn DashboardRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub auth_service: Arc<AuthService>,
    pub access_control: Arc<AccessControl>,
    pub dashboard_service: Arc<DashboardService>,
    pub dispatcher: Arc<NotificationDispatcher>,
}
