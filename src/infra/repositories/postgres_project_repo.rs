use crate::domain::{models::project::Project, ports::ProjectRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresProjectRepo {
    pool: PgPool,
}

impl PostgresProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepo {
    async fn create(&self, project: &Project) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (id, name, description, owner_id, created_at) VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, description, owner_id, created_at",
        )
            .bind(&project.id)
            .bind(&project.name)
            .bind(&project.description)
            .bind(&project.owner_id)
            .bind(project.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Project>, AppError> {
        sqlx::query_as::<_, Project>(
            "SELECT id, name, description, owner_id, created_at FROM projects WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_accessible(&self, user_id: &str) -> Result<Vec<Project>, AppError> {
        sqlx::query_as::<_, Project>(
            "SELECT id, name, description, owner_id, created_at FROM projects
             WHERE owner_id = $1 OR id IN (SELECT project_id FROM project_members WHERE user_id = $1)
             ORDER BY created_at DESC",
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn accessible_project_ids(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            "SELECT id FROM projects
             WHERE owner_id = $1 OR id IN (SELECT project_id FROM project_members WHERE user_id = $1)",
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, project: &Project) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET name = $1, description = $2 WHERE id = $3
             RETURNING id, name, description, owner_id, created_at",
        )
            .bind(&project.name)
            .bind(&project.description)
            .bind(&project.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        // Notifications reference tasks, so they go before the tasks do.
        sqlx::query(
            "DELETE FROM notifications WHERE related_project_id = $1
             OR related_task_id IN (SELECT id FROM tasks WHERE project_id = $1)",
        )
            .bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        // Detach replies so the self-referencing FK never sees a dangling parent.
        sqlx::query("UPDATE messages SET parent_id = NULL WHERE project_id = $1")
            .bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM messages WHERE project_id = $1")
            .bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project".into()));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn has_access(&self, project_id: &str, user_id: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                 SELECT 1 FROM projects p
                 WHERE p.id = $1
                   AND (p.owner_id = $2
                        OR EXISTS(SELECT 1 FROM project_members m WHERE m.project_id = p.id AND m.user_id = $2))
             )",
        )
            .bind(project_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn has_ownership(&self, project_id: &str, user_id: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1 AND owner_id = $2)",
        )
            .bind(project_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
