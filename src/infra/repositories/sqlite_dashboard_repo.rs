use crate::domain::{
    models::dashboard::{DayCount, StatusCount},
    models::project::Project,
    models::task::{Task, STATUS_DONE},
    ports::DashboardRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

pub struct SqliteDashboardRepo {
    pool: SqlitePool,
}

impl SqliteDashboardRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn in_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

#[async_trait]
impl DashboardRepository for SqliteDashboardRepo {
    async fn count_tasks_in_projects(&self, project_ids: &[String]) -> Result<i64, AppError> {
        let sql = format!(
            "SELECT COUNT(*) FROM tasks WHERE project_id IN ({})",
            in_placeholders(project_ids.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for id in project_ids {
            query = query.bind(id);
        }
        query.fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn my_task_counts(&self, user_id: &str) -> Result<(i64, i64, i64), AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total,
                    COALESCE(SUM(CASE WHEN status != ? THEN 1 ELSE 0 END), 0) AS pending,
                    COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0) AS completed
             FROM tasks WHERE assignee_id = ?"
        )
            .bind(STATUS_DONE)
            .bind(STATUS_DONE)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok((row.get("total"), row.get("pending"), row.get("completed")))
    }

    async fn status_counts_in_projects(&self, project_ids: &[String]) -> Result<Vec<StatusCount>, AppError> {
        let sql = format!(
            "SELECT status, COUNT(*) AS count FROM tasks WHERE project_id IN ({}) GROUP BY status",
            in_placeholders(project_ids.len())
        );
        let mut query = sqlx::query_as::<_, StatusCount>(&sql);
        for id in project_ids {
            query = query.bind(id);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_tasks_created_since(&self, project_ids: &[String], since: DateTime<Utc>) -> Result<i64, AppError> {
        let sql = format!(
            "SELECT COUNT(*) FROM tasks WHERE project_id IN ({}) AND created_at >= ?",
            in_placeholders(project_ids.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for id in project_ids {
            query = query.bind(id);
        }
        query.bind(since).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_messages_created_since(&self, project_ids: &[String], since: DateTime<Utc>) -> Result<i64, AppError> {
        let sql = format!(
            "SELECT COUNT(*) FROM messages WHERE project_id IN ({}) AND created_at >= ?",
            in_placeholders(project_ids.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for id in project_ids {
            query = query.bind(id);
        }
        query.bind(since).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn upcoming_tasks(&self, user_id: &str, from: DateTime<Utc>, until: DateTime<Utc>, limit: i64) -> Result<Vec<Task>, AppError> {
        sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks
             WHERE assignee_id = ?
               AND due_date IS NOT NULL AND due_date >= ? AND due_date <= ?
               AND status != ?
             ORDER BY due_date ASC
             LIMIT ?"
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
            "SELECT * FROM projects
             WHERE owner_id = ? OR id IN (SELECT project_id FROM project_members WHERE user_id = ?)
             ORDER BY created_at DESC
             LIMIT ?"
        )
            .bind(user_id)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn status_counts_for_project(&self, project_id: &str) -> Result<Vec<StatusCount>, AppError> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM tasks WHERE project_id = ? GROUP BY status"
        )
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn member_count(&self, project_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM project_members WHERE project_id = ?")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn daily_task_counts(&self, project_ids: &[String], start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<DayCount>, AppError> {
        let sql = format!(
            "SELECT date(created_at) AS date, COUNT(*) AS count
             FROM tasks
             WHERE project_id IN ({}) AND created_at >= ? AND created_at <= ?
             GROUP BY date(created_at)
             ORDER BY date(created_at) ASC",
            in_placeholders(project_ids.len())
        );
        let mut query = sqlx::query_as::<_, DayCount>(&sql);
        for id in project_ids {
            query = query.bind(id);
        }
        query.bind(start).bind(end).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
