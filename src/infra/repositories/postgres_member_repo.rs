use crate::domain::{
    models::project_member::{MemberProfile, ProjectMember},
    ports::ProjectMemberRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresMemberRepo {
    pool: PgPool,
}

impl PostgresMemberRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectMemberRepository for PostgresMemberRepo {
    async fn add(&self, member: &ProjectMember) -> Result<ProjectMember, AppError> {
        sqlx::query_as::<_, ProjectMember>(
            "INSERT INTO project_members (id, project_id, user_id, role, created_at) VALUES ($1, $2, $3, $4, $5)
             RETURNING id, project_id, user_id, role, created_at",
        )
            .bind(&member.id)
            .bind(&member.project_id)
            .bind(&member.user_id)
            .bind(&member.role)
            .bind(member.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find(&self, project_id: &str, user_id: &str) -> Result<Option<ProjectMember>, AppError> {
        sqlx::query_as::<_, ProjectMember>(
            "SELECT id, project_id, user_id, role, created_at FROM project_members WHERE project_id = $1 AND user_id = $2",
        )
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_with_users(&self, project_id: &str) -> Result<Vec<MemberProfile>, AppError> {
        sqlx::query_as::<_, MemberProfile>(
            "SELECT m.id, m.user_id, u.name, u.email, m.role, m.created_at
             FROM project_members m
             JOIN users u ON u.id = m.user_id
             WHERE m.project_id = $1
             ORDER BY m.created_at ASC",
        )
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn remove(&self, project_id: &str, user_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Member".into()));
        }
        Ok(())
    }
}
