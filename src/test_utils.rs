use crate::database::session::SessionRepository;
use crate::database::user::UserRepository;
use crate::error::app_error::AppError;
use crate::models::session::{Session, SessionUser};
use crate::models::user::User;
use crate::service::password;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory stand-in for `PostgresRepository`, for exercising the session
/// manager and login flow without a database.
#[derive(Default)]
pub struct MockRepository {
    users: Mutex<HashMap<Uuid, User>>,
    sessions: Mutex<HashMap<String, Session>>,
}

impl MockRepository {
    /// A repository pre-populated with one user; returns the user's id.
    pub fn with_user(email: &str, password: &str, is_admin: bool) -> (Self, Uuid) {
        let repo = Self::default();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password::hash_password(password).expect("hashing failed"),
            is_admin,
            created_at: Utc::now(),
        };
        let id = user.id;
        repo.users.lock().unwrap().insert(id, user);
        (repo, id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn session_expiry(&self, id: &str) -> Option<DateTime<Utc>> {
        self.sessions.lock().unwrap().get(id).map(|s| s.expires_at)
    }

    pub fn set_session_expiry(&self, id: &str, expires_at: DateTime<Utc>) {
        if let Some(session) = self.sessions.lock().unwrap().get_mut(id) {
            session.expires_at = expires_at;
        }
    }
}

#[async_trait::async_trait]
impl UserRepository for MockRepository {
    async fn create_user(&self, email: &str, password: &str, is_admin: bool) -> Result<User, AppError> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password::hash_password(password)?,
            is_admin,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().values().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }
}

#[async_trait::async_trait]
impl SessionRepository for MockRepository {
    async fn insert_session(&self, session: &Session) -> Result<(), AppError> {
        self.sessions.lock().unwrap().insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn find_session(&self, id: &str) -> Result<Option<(Session, SessionUser)>, AppError> {
        let Some(session) = self.sessions.lock().unwrap().get(id).cloned() else {
            return Ok(None);
        };
        // Sessions must never resolve to a deleted user.
        let Some(user) = self.users.lock().unwrap().get(&session.user_id).cloned() else {
            return Ok(None);
        };
        let session_user = SessionUser {
            id: user.id,
            email: user.email,
            is_admin: user.is_admin,
        };
        Ok(Some((session, session_user)))
    }

    async fn update_session_expiry(&self, id: &str, expires_at: DateTime<Utc>) -> Result<(), AppError> {
        self.set_session_expiry(id, expires_at);
        Ok(())
    }

    async fn delete_session(&self, id: &str) -> Result<(), AppError> {
        self.sessions.lock().unwrap().remove(id);
        Ok(())
    }

    async fn delete_expired_sessions_for_user(&self, user_id: &Uuid) -> Result<(), AppError> {
        let now = Utc::now();
        self.sessions.lock().unwrap().retain(|_, s| s.user_id != *user_id || s.expires_at > now);
        Ok(())
    }
}
