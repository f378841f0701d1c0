use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{NewProject, NewUser, Project, ProfileChanges, ProjectChanges, Session, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Everything the request handlers persist. One handle per process, built at
/// startup and shared through `AppState`.
#[async_trait]
pub trait Storage: ProjectStore + UserStore + SessionStore + Send + Sync + 'static {
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ProjectStore {
    /// All projects, oldest first
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;
    async fn create_project(&self, project: NewProject) -> Result<Option<Project>, StoreError>;
    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<Project>, StoreError>;
    /// Removes the project and returns what was stored
    async fn delete_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;
    async fn delete_all_projects(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait UserStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Fails with `StoreError::Conflict` when the email is taken
    async fn create_user(&self, user: NewUser) -> Result<Option<User>, StoreError>;
    async fn update_user(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait SessionStore {
    /// Unexpired session by id
    async fn load_session(&self, id: &str) -> Result<Option<Session>, StoreError>;
    /// Insert or refresh
    async fn save_session(&self, session: &Session) -> Result<(), StoreError>;
    async fn purge_expired_sessions(&self) -> Result<u64, StoreError>;
}

pub const EMAIL_TAKEN: &str = "Email is already in use";
