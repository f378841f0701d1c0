use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{NewProject, NewUser, Project, ProfileChanges, ProjectChanges, Session, User};
use super::store::{ProjectStore, SessionStore, Storage, StoreError, UserStore, EMAIL_TAKEN};

/// Process-local storage for development without Postgres and for tests.
/// Contents are lost when the handle is dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    projects: RwLock<HashMap<Uuid, Project>>,
    users: RwLock<HashMap<Uuid, User>>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for MemoryStorage {
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let projects = self.projects.read().await;
        let mut all: Vec<Project> = projects.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn create_project(&self, project: NewProject) -> Result<Option<Project>, StoreError> {
        let now = Utc::now();
        let created = Project {
            id: Uuid::new_v4(),
            title: project.title,
            description: project.description,
            image_url: project.image_url,
            created_at: now,
            updated_at: now,
        };
        self.projects.write().await.insert(created.id, created.clone());
        Ok(Some(created))
    }

    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<Project>, StoreError> {
        let mut projects = self.projects.write().await;
        Ok(projects.get_mut(&id).map(|project| {
            project.title = changes.title;
            project.description = changes.description;
            project.updated_at = Utc::now();
            project.clone()
        }))
    }

    async fn delete_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.write().await.remove(&id))
    }

    async fn delete_all_projects(&self) -> Result<u64, StoreError> {
        let mut projects = self.projects.write().await;
        let count = projects.len() as u64;
        projects.clear();
        Ok(count)
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            username: user.username,
            image_url: None,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());
        Ok(Some(created))
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.id != id && u.email.eq_ignore_ascii_case(&changes.email)) {
            return Err(StoreError::Conflict(EMAIL_TAKEN.to_string()));
        }

        Ok(users.get_mut(&id).map(|user| {
            user.email = changes.email;
            user.username = changes.username;
            if let Some(image_url) = changes.image_url {
                user.image_url = Some(image_url);
            }
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl SessionStore for MemoryStorage {
    async fn load_session(&self, id: &str) -> Result<Option<Session>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).filter(|s| !s.is_expired()).cloned())
    }

    async fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn purge_expired_sessions(&self) -> Result<u64, StoreError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_project(title: &str) -> NewProject {
        NewProject {
            title: title.to_string(),
            description: "desc".to_string(),
            image_url: None,
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: "someone".to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn project_lifecycle() {
        let store = MemoryStorage::new();
        assert!(store.list_projects().await.unwrap().is_empty());

        let created = store.create_project(new_project("A")).await.unwrap().unwrap();
        assert_eq!(store.find_project(created.id).await.unwrap(), Some(created.clone()));

        let updated = store
            .update_project(
                created.id,
                ProjectChanges {
                    title: "A2".to_string(),
                    description: "B".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "A2");
        assert!(updated.updated_at >= created.updated_at);

        let deleted = store.delete_project(created.id).await.unwrap();
        assert_eq!(deleted.map(|p| p.title), Some("A2".to_string()));
        assert!(store.delete_project(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_of_missing_project_returns_none() {
        let store = MemoryStorage::new();
        let changes = ProjectChanges {
            title: "x".to_string(),
            description: "y".to_string(),
        };
        assert!(store.update_project(Uuid::new_v4(), changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_all_reports_count() {
        let store = MemoryStorage::new();
        store.create_project(new_project("one")).await.unwrap();
        store.create_project(new_project("two")).await.unwrap();
        assert_eq!(store.delete_all_projects().await.unwrap(), 2);
        assert!(store.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStorage::new();
        store.create_user(new_user("a@b.io")).await.unwrap();
        let err = store.create_user(new_user("a@b.io")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn email_lookup_and_conflicts_ignore_case() {
        let store = MemoryStorage::new();
        let user = store.create_user(new_user("ada@b.io")).await.unwrap().unwrap();
        assert_eq!(store.find_user_by_email("Ada@B.io").await.unwrap().map(|u| u.id), Some(user.id));

        let err = store.create_user(new_user("ADA@b.io")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn profile_update_keeps_image_when_absent() {
        let store = MemoryStorage::new();
        let user = store.create_user(new_user("a@b.io")).await.unwrap().unwrap();
        store
            .update_user(
                user.id,
                ProfileChanges {
                    email: "a@b.io".to_string(),
                    username: "first".to_string(),
                    image_url: Some("https://img/x.png".to_string()),
                },
            )
            .await
            .unwrap();
        let updated = store
            .update_user(
                user.id,
                ProfileChanges {
                    email: "c@d.io".to_string(),
                    username: "second".to_string(),
                    image_url: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.email, "c@d.io");
        assert_eq!(updated.image_url.as_deref(), Some("https://img/x.png"));
    }

    #[tokio::test]
    async fn expired_sessions_are_invisible_and_purged() {
        let store = MemoryStorage::new();
        let live = Session::new(Uuid::new_v4(), Duration::days(1));
        let mut stale = Session::new(Uuid::new_v4(), Duration::days(1));
        stale.expires_at = Utc::now() - Duration::minutes(1);
        store.save_session(&live).await.unwrap();
        store.save_session(&stale).await.unwrap();

        assert!(store.load_session(&live.id).await.unwrap().is_some());
        assert!(store.load_session(&stale.id).await.unwrap().is_none());
        assert_eq!(store.purge_expired_sessions().await.unwrap(), 1);
    }
}
