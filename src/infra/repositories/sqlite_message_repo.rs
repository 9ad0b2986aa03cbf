use crate::domain::{
    models::message::{Message, MessageWithAuthor},
    ports::MessageRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteMessageRepo {
    pool: SqlitePool,
}

impl SqliteMessageRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for SqliteMessageRepo {
    async fn create(&self, message: &Message) -> Result<Message, AppError> {
        sqlx::query_as::<_, Message>(
            "INSERT INTO messages (id, project_id, user_id, content, parent_id, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&message.id)
            .bind(&message.project_id)
            .bind(&message.user_id)
            .bind(&message.content)
            .bind(&message.parent_id)
            .bind(message.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Message>, AppError> {
        sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_project(&self, project_id: &str, limit: i64, offset: i64) -> Result<Vec<MessageWithAuthor>, AppError> {
        sqlx::query_as::<_, MessageWithAuthor>(
            "SELECT m.*, u.name AS user_name
             FROM messages m
             JOIN users u ON u.id = m.user_id
             WHERE m.project_id = ?
             ORDER BY m.created_at ASC
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
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE project_id = ?")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
