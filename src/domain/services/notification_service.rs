use std::sync::Arc;
use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::domain::models::notification::{
    NewNotificationParams, Notification, TYPE_PROJECT_MEMBER_ADDED, TYPE_TASK_ASSIGNED,
    TYPE_TASK_DUE_SOON, TYPE_TASK_STATUS_CHANGED,
};
use crate::domain::models::project::Project;
use crate::domain::models::task::Task;
use crate::domain::ports::{NotificationRepository, ProjectRepository, UserRepository};

/// Best-effort side channel: every public method swallows its own failures.
/// A notification that cannot be written is logged and dropped; the mutation
/// that triggered it has already committed and must not be affected.
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationRepository>,
    users: Arc<dyn UserRepository>,
    projects: Arc<dyn ProjectRepository>,
}

impl NotificationDispatcher {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self { notifications, users, projects }
    }

    /// Fired when a task gains an assignee, on creation or reassignment.
    pub async fn task_assigned(&self, task: &Task) {
        let Some(assignee_id) = task.assignee_id.as_deref() else {
            return;
        };

        let Some(project) = self.fetch_project(&task.project_id).await else {
            return;
        };

        self.create(NewNotificationParams {
            user_id: assignee_id.to_string(),
            kind: TYPE_TASK_ASSIGNED.to_string(),
            title: "New Task Assigned".to_string(),
            message: format!(
                "You have been assigned to task \"{}\" in project \"{}\"",
                task.title, project.name
            ),
            related_project_id: Some(project.id),
            related_task_id: Some(task.id.clone()),
        })
        .await;
    }

    /// Fired on a status transition. Silent when the task is unassigned or
    /// the actor is the assignee themself.
    pub async fn task_status_changed(&self, task: &Task, old_status: &str, actor_id: &str) {
        let Some(assignee_id) = task.assignee_id.as_deref() else {
            return;
        };
        if assignee_id == actor_id {
            return;
        }

        let actor_name = match self.users.find_by_id(actor_id).await {
            Ok(Some(actor)) => actor.name,
            Ok(None) => "Someone".to_string(),
            Err(e) => {
                warn!("Skipping status-change notification, actor lookup failed: {:?}", e);
                return;
            }
        };

        self.create(NewNotificationParams {
            user_id: assignee_id.to_string(),
            kind: TYPE_TASK_STATUS_CHANGED.to_string(),
            title: "Task Status Updated".to_string(),
            message: format!(
                "{} changed status of \"{}\" from {} to {}",
                actor_name, task.title, old_status, task.status
            ),
            related_project_id: Some(task.project_id.clone()),
            related_task_id: Some(task.id.clone()),
        })
        .await;
    }

    /// Fired by the periodic sweep for assigned tasks due within one day.
    /// De-duplicated: an existing unread due-soon notification for the same
    /// task suppresses a new one.
    pub async fn task_due_soon(&self, task: &Task) {
        let Some(assignee_id) = task.assignee_id.as_deref() else {
            return;
        };
        let Some(due_date) = task.due_date else {
            return;
        };
        if due_date - Utc::now() > Duration::days(1) {
            return;
        }

        match self
            .notifications
            .has_unread_for_task(assignee_id, &task.id, TYPE_TASK_DUE_SOON)
            .await
        {
            Ok(true) => {
                debug!("Due-soon notification already pending for task {}", task.id);
                return;
            }
            Ok(false) => {}
            Err(e) => {
                warn!("Skipping due-soon notification, dedup check failed: {:?}", e);
                return;
            }
        }

        let Some(project) = self.fetch_project(&task.project_id).await else {
            return;
        };

        self.create(NewNotificationParams {
            user_id: assignee_id.to_string(),
            kind: TYPE_TASK_DUE_SOON.to_string(),
            title: "Task Due Soon".to_string(),
            message: format!(
                "Task \"{}\" in project \"{}\" is due soon",
                task.title, project.name
            ),
            related_project_id: Some(project.id),
            related_task_id: Some(task.id.clone()),
        })
        .await;
    }

    /// Fired when a user is added to a project.
    pub async fn member_added(&self, project: &Project, added_user_id: &str, inviter_id: &str) {
        let inviter_name = match self.users.find_by_id(inviter_id).await {
            Ok(Some(inviter)) => inviter.name,
            Ok(None) => "Someone".to_string(),
            Err(e) => {
                warn!("Skipping member-added notification, inviter lookup failed: {:?}", e);
                return;
            }
        };

        self.create(NewNotificationParams {
            user_id: added_user_id.to_string(),
            kind: TYPE_PROJECT_MEMBER_ADDED.to_string(),
            title: "Added to Project".to_string(),
            message: format!("{} added you to project \"{}\"", inviter_name, project.name),
            related_project_id: Some(project.id.clone()),
            related_task_id: None,
        })
        .await;
    }

    async fn fetch_project(&self, project_id: &str) -> Option<Project> {
        match self.projects.find_by_id(project_id).await {
            Ok(Some(project)) => Some(project),
            Ok(None) => None,
            Err(e) => {
                warn!("Skipping notification, project lookup failed: {:?}", e);
                None
            }
        }
    }

    async fn create(&self, params: NewNotificationParams) {
        let notification = Notification::new(params);
        if let Err(e) = self.notifications.create(&notification).await {
            warn!(
                "Failed to create {} notification for user {}: {:?}",
                notification.kind, notification.user_id, e
            );
        }
    }
}
