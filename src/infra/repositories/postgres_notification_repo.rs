use crate::domain::{
    models::notification::{Notification, NotificationView},
    ports::NotificationRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresNotificationRepo {
    pool: PgPool,
}

impl PostgresNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepo {
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, user_id, type, title, message, related_project_id, related_task_id, is_read, created_at, read_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id, user_id, type, title, message, related_project_id, related_task_id, is_read, created_at, read_at",
        )
            .bind(&notification.id)
            .bind(&notification.user_id)
            .bind(&notification.kind)
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(&notification.related_project_id)
            .bind(&notification.related_task_id)
            .bind(notification.is_read)
            .bind(notification.created_at)
            .bind(notification.read_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str, limit: i64, offset: i64) -> Result<Vec<NotificationView>, AppError> {
        sqlx::query_as::<_, NotificationView>(
            "SELECT n.id, n.type, n.title, n.message, n.related_project_id, n.related_task_id,
                    p.name AS project_name, t.title AS task_title,
                    n.is_read, n.created_at, n.read_at
             FROM notifications n
             LEFT JOIN projects p ON p.id = n.related_project_id
             LEFT JOIN tasks t ON t.id = n.related_task_id
             WHERE n.user_id = $1
             ORDER BY n.created_at DESC
             LIMIT $2 OFFSET $3",
        )
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_user(&self, user_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn unread_count(&self, user_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_read(&self, id: &str, user_id: &str, read_at: DateTime<Utc>) -> Result<bool, AppError> {
        // COALESCE keeps the original read_at when re-marking a read row.
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = COALESCE(read_at, $1) WHERE id = $2 AND user_id = $3",
        )
            .bind(read_at)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: &str, read_at: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = $1 WHERE user_id = $2 AND is_read = FALSE",
        )
            .bind(read_at)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }

    async fn has_unread_for_task(&self, user_id: &str, task_id: &str, kind: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                 SELECT 1 FROM notifications
                 WHERE user_id = $1 AND related_task_id = $2 AND type = $3 AND is_read = FALSE
             )",
        )
            .bind(user_id)
            .bind(task_id)
            .bind(kind)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
