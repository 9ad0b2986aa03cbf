use crate::domain::{
    models::dashboard::{DayCount, StatusCount},
    models::project::Project,
    models::task::{Task, STATUS_DONE},
    ports::DashboardRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

pub struct PostgresDashboardRepo {
    pool: PgPool,
}

impl PostgresDashboardRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardRepository for PostgresDashboardRepo {
    async fn count_tasks_in_projects(&self, project_ids: &[String]) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE project_id = ANY($1)")
            .bind(project_ids)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn my_task_counts(&self, user_id: &str) -> Result<(i64, i64, i64), AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE status != $1) AS pending,
                    COUNT(*) FILTER (WHERE status = $1) AS completed
             FROM tasks WHERE assignee_id = $2",
        )
            .bind(STATUS_DONE)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok((row.get("total"), row.get("pending"), row.get("completed")))
    }

    async fn status_counts_in_projects(&self, project_ids: &[String]) -> Result<Vec<StatusCount>, AppError> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM tasks WHERE project_id = ANY($1) GROUP BY status",
        )
            .bind(project_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_tasks_created_since(&self, project_ids: &[String], since: DateTime<Utc>) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tasks WHERE project_id = ANY($1) AND created_at >= $2",
        )
            .bind(project_ids)
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_messages_created_since(&self, project_ids: &[String], since: DateTime<Utc>) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE project_id = ANY($1) AND created_at >= $2",
        )
            .bind(project_ids)
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upcoming_tasks(&self, user_id: &str, from: DateTime<Utc>, until: DateTime<Utc>, limit: i64) -> Result<Vec<Task>, AppError> {
        sqlx::query_as::<_, Task>(
            "SELECT id, project_id, title, description, assignee_id, due_date, status, priority, created_at, updated_at
             FROM tasks
             WHERE assignee_id = $1
               AND due_date IS NOT NULL AND due_date >= $2 AND due_date <= $3
               AND status != $4
             ORDER BY due_date ASC
             LIMIT $5",
        )
            .bind(user_id)
            .bind(from)
            .bind(until)
            .bind(STATUS_DONE)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn recent_projects(&self, user_id: &str, limit: i64) -> Result<Vec<Project>, AppError> {
        sqlx::query_as::<_, Project>(
            "SELECT id, name, description, owner_id, created_at FROM projects
             WHERE owner_id = $1 OR id IN (SELECT project_id FROM project_members WHERE user_id = $1)
             ORDER BY created_at DESC
             LIMIT $2",
        )
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn status_counts_for_project(&self, project_id: &str) -> Result<Vec<StatusCount>, AppError> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM tasks WHERE project_id = $1 GROUP BY status",
        )
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn member_count(&self, project_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM project_members WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn daily_task_counts(&self, project_ids: &[String], start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<DayCount>, AppError> {
        sqlx::query_as::<_, DayCount>(
            "SELECT (created_at AT TIME ZONE 'UTC')::date AS date, COUNT(*) AS count
             FROM tasks
             WHERE project_id = ANY($1) AND created_at >= $2 AND created_at <= $3
             GROUP BY (created_at AT TIME ZONE 'UTC')::date
             ORDER BY (created_at AT TIME ZONE 'UTC')::date ASC",
        )
            .bind(project_ids)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
