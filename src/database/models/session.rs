use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Server-side half of the session cookie
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Uuid, max_age: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().simple().to_string(),
            user_id,
            expires_at: now + max_age,
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Slides the expiry forward from now
    pub fn touch(&mut self, max_age: Duration) {
        self.expires_at = Utc::now() + max_age;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_expires_after_max_age() {
        let session = Session::new(Uuid::new_v4(), Duration::days(30));
        assert!(!session.is_expired());
        assert_eq!(session.id.len(), 32);
        let lifetime = session.expires_at - session.created_at;
        assert_eq!(lifetime.num_days(), 30);
    }

    #[test]
    fn touch_extends_expired_session() {
        let mut session = Session::new(Uuid::new_v4(), Duration::days(30));
        session.expires_at = Utc::now() - Duration::seconds(1);
        assert!(session.is_expired());
        session.touch(Duration::days(30));
        assert!(!session.is_expired());
    }
}
