use std::sync::Arc;
use crate::domain::ports::ProjectRepository;
use crate::error::AppError;

/// Decides whether a user may see or administer a project. The owner has full
/// rights without a membership row; members are granted read/write on the
/// project's tasks and messages.
pub struct AccessControl {
    projects: Arc<dyn ProjectRepository>,
}

impl AccessControl {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    /// True iff the user owns the project or holds a membership row.
    /// False for nonexistent projects. One round trip.
    pub async fn has_access(&self, project_id: &str, user_id: &str) -> Result<bool, AppError> {
        self.projects.has_access(project_id, user_id).await
    }

    /// Strict owner check, for rename/delete/member administration.
    pub async fn has_ownership(&self, project_id: &str, user_id: &str) -> Result<bool, AppError> {
        self.projects.has_ownership(project_id, user_id).await
    }

    /// 404 when the project does not exist, 403 when it exists but the user
    /// is neither owner nor member.
    pub async fn require_access(&self, project_id: &str, user_id: &str) -> Result<(), AppError> {
        if self.has_access(project_id, user_id).await? {
            return Ok(());
        }
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(AppError::NotFound("Project".into()));
        }
        Err(AppError::AccessDenied)
    }

    pub async fn require_ownership(&self, project_id: &str, user_id: &str) -> Result<(), AppError> {
        if self.has_ownership(project_id, user_id).await? {
            return Ok(());
        }
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(AppError::NotFound("Project".into()));
        }
        Err(AppError::AccessDenied)
    }
}
