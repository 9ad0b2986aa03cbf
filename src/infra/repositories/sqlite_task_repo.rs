use crate::domain::{
    models::task::{Task, TaskWithAssignee, STATUS_DONE},
    ports::TaskRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteTaskRepo {
    pool: SqlitePool,
}

impl SqliteTaskRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepo {
    async fn create(&self, task: &Task) -> Result<Task, AppError> {
        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, project_id, title, description, assignee_id, due_date, status, priority, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&task.id)
            .bind(&task.project_id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(&task.assignee_id)
            .bind(task.due_date)
            .bind(&task.status)
            .bind(&task.priority)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Task>, AppError> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_project(&self, project_id: &str, limit: i64, offset: i64) -> Result<Vec<TaskWithAssignee>, AppError> {
        sqlx::query_as::<_, TaskWithAssignee>(
            "SELECT t.*, u.name AS assignee_name
             FROM tasks t
             LEFT JOIN users u ON u.id = t.assignee_id
             WHERE t.project_id = ?
             ORDER BY t.created_at DESC
             LIMIT ? OFFSET ?"
        )
            .bind(project_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_project(&self, project_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE project_id = ?")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, task: &Task) -> Result<Task, AppError> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET title=?, description=?, assignee_id=?, due_date=?, status=?, priority=?, updated_at=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&task.title)
            .bind(&task.description)
            .bind(&task.assignee_id)
            .bind(task.due_date)
            .bind(&task.status)
            .bind(&task.priority)
            .bind(task.updated_at)
            .bind(&task.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Notifications reference tasks, so they go first.
        sqlx::query("DELETE FROM notifications WHERE related_task_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Task".into()));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_due_between(&self, from: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<Task>, AppError> {
        sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks
             WHERE assignee_id IS NOT NULL
               AND due_date IS NOT NULL AND due_date >= ? AND due_date <= ?
               AND status != ?"
        )
            .bind(from)
            .bind(until)
            .bind(STATUS_DONE)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
