use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{NewProject, NewUser, Project, ProfileChanges, ProjectChanges, Session, User};
use super::store::{ProjectStore, SessionStore, Storage, StoreError, UserStore, EMAIL_TAKEN};

const PROJECT_COLUMNS: &str = "id, title, description, image_url, created_at, updated_at";
const USER_COLUMNS: &str = "id, email, username, image_url, password_hash, created_at, updated_at";

/// Postgres-backed storage
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict(EMAIL_TAKEN.to_string())
        }
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for PgStorage {
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at, id");
        let projects = sqlx::query_as::<_, Project>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(projects)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn create_project(&self, project: NewProject) -> Result<Option<Project>, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO projects (id, title, description, image_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) RETURNING {PROJECT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Project>(&sql)
            .bind(Uuid::new_v4())
            .bind(&project.title)
            .bind(&project.description)
            .bind(&project.image_url)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<Project>, StoreError> {
        let sql = format!(
            "UPDATE projects SET title = $2, description = $3, updated_at = $4 \
             WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let sql = format!("DELETE FROM projects WHERE id = $1 RETURNING {PROJECT_COLUMNS}");
        let deleted = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(deleted)
    }

    async fn delete_all_projects(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM projects").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl UserStore for PgStorage {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<Option<User>, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (id, email, username, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "UPDATE users SET email = $2, username = $3, image_url = COALESCE($4, image_url), \
             updated_at = $5 WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&changes.email)
            .bind(&changes.username)
            .bind(&changes.image_url)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)
    }
}

#[async_trait]
impl SessionStore for PgStorage {
    async fn load_session(&self, id: &str) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, user_id, expires_at, created_at FROM sessions \
             WHERE id = $1 AND expires_at > now()",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, expires_at, created_at) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET user_id = EXCLUDED.user_id, expires_at = EXCLUDED.expires_at",
        )
        .bind(&session.id)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn purge_expired_sessions(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
