use crate::config::SessionConfig;
use crate::database::session::SessionRepository;
use crate::error::app_error::AppError;
use crate::models::session::{Session, SessionUser};
use chrono::Utc;
use password_hash::rand_core::{OsRng, RngCore};
use rocket::http::Cookie;
use rocket::time::OffsetDateTime;
use uuid::Uuid;

/// Outcome of a successful validation. `fresh` signals that the expiry was
/// just extended and the caller must issue a refreshed cookie.
#[derive(Debug)]
pub struct ValidatedSession {
    pub session: Session,
    pub user: SessionUser,
    pub fresh: bool,
}

/// Creates, validates, rotates and invalidates sessions against an injected
/// store, and builds the matching cookies.
pub struct SessionManager<'a, R: SessionRepository> {
    repo: &'a R,
    config: &'a SessionConfig,
}

/// 32 bytes from the OS CSPRNG, hex-encoded. The token is the only secret
/// tying a client to its session.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl<'a, R: SessionRepository> SessionManager<'a, R> {
    pub fn new(repo: &'a R, config: &'a SessionConfig) -> Self {
        Self { repo, config }
    }

    pub async fn create_session(&self, user_id: &Uuid) -> Result<Session, AppError> {
        // Piggyback lazy cleanup of this user's dead sessions on login.
        self.repo.delete_expired_sessions_for_user(user_id).await?;

        let session = Session {
            id: generate_session_token(),
            user_id: *user_id,
            expires_at: Utc::now() + self.config.ttl(),
        };
        self.repo.insert_session(&session).await?;

        Ok(session)
    }

    /// Resolves a cookie token to a session and user. Expired sessions are
    /// deleted on sight; sessions past the rotation threshold get their
    /// expiry pushed out to a full TTL again.
    pub async fn validate_session(&self, id: &str) -> Result<Option<ValidatedSession>, AppError> {
        let Some((mut session, user)) = self.repo.find_session(id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        if now >= session.expires_at {
            self.repo.delete_session(id).await?;
            return Ok(None);
        }

        let fresh = session.expires_at - now < self.config.rotation_threshold();
        if fresh {
            let expires_at = now + self.config.ttl();
            self.repo.update_session_expiry(id, expires_at).await?;
            session.expires_at = expires_at;
        }

        Ok(Some(ValidatedSession { session, user, fresh }))
    }

    /// Idempotent: unknown ids are not an error.
    pub async fn invalidate_session(&self, id: &str) -> Result<(), AppError> {
        self.repo.delete_session(id).await
    }

    pub fn create_session_cookie(&self, session: &Session) -> Cookie<'static> {
        let expires = OffsetDateTime::from_unix_timestamp(session.expires_at.timestamp()).unwrap_or(OffsetDateTime::UNIX_EPOCH);

        let mut cookie = self.base_cookie(session.id.clone());
        cookie.set_expires(expires);
        cookie
    }

    /// Empty value with an expiry in the past; actively clears the cookie on
    /// logout or when an invalid token was presented.
    pub fn create_blank_session_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.base_cookie(String::new());
        cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
        cookie.set_max_age(rocket::time::Duration::ZERO);
        cookie
    }

    fn base_cookie(&self, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.config.cookie_name.clone(), value);
        cookie.set_path(self.config.cookie_path.clone());
        cookie.set_http_only(true);
        cookie.set_secure(self.config.cookie_secure);
        cookie.set_same_site(self.config.same_site());
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockRepository;
    use chrono::Duration;

    fn config() -> SessionConfig {
        SessionConfig::default()
    }

    #[test]
    fn session_tokens_are_long_and_unique() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[rocket::async_test]
    async fn create_then_validate_resolves_user_without_rotation() {
        let (repo, user_id) = MockRepository::with_user("a@b.com", "correct", true);
        let config = config();
        let manager = SessionManager::new(&repo, &config);

        let session = manager.create_session(&user_id).await.expect("create failed");
        let validated = manager.validate_session(&session.id).await.expect("validate failed").expect("no session");

        assert_eq!(validated.user.id, user_id);
        assert_eq!(validated.session.id, session.id);
        // A full TTL remains, far above the rotation threshold.
        assert!(!validated.fresh);
    }

    #[rocket::async_test]
    async fn session_close_to_expiry_is_rotated_once() {
        let (repo, user_id) = MockRepository::with_user("a@b.com", "correct", true);
        let config = config();
        let manager = SessionManager::new(&repo, &config);

        let session = manager.create_session(&user_id).await.expect("create failed");
        // 10 of 30 days left, below the 15-day threshold.
        repo.set_session_expiry(&session.id, Utc::now() + Duration::days(10));

        let validated = manager.validate_session(&session.id).await.expect("validate failed").expect("no session");
        assert!(validated.fresh);
        let remaining = validated.session.expires_at - Utc::now();
        assert!(remaining > Duration::days(29));
        assert!(remaining <= Duration::days(30));

        // Just rotated, so the next validation leaves it alone.
        let revalidated = manager.validate_session(&session.id).await.expect("validate failed").expect("no session");
        assert!(!revalidated.fresh);
    }

    #[rocket::async_test]
    async fn expired_session_is_deleted_lazily() {
        let (repo, user_id) = MockRepository::with_user("a@b.com", "correct", true);
        let config = config();
        let manager = SessionManager::new(&repo, &config);

        let session = manager.create_session(&user_id).await.expect("create failed");
        repo.set_session_expiry(&session.id, Utc::now() - Duration::minutes(1));

        let validated = manager.validate_session(&session.id).await.expect("validate failed");
        assert!(validated.is_none());
        // Lazy expiry removed the row.
        assert!(repo.session_expiry(&session.id).is_none());
    }

    #[rocket::async_test]
    async fn validating_an_unknown_token_yields_nothing() {
        let (repo, _) = MockRepository::with_user("a@b.com", "correct", true);
        let config = config();
        let manager = SessionManager::new(&repo, &config);

        let validated = manager.validate_session("deadbeef").await.expect("validate failed");
        assert!(validated.is_none());
    }

    #[rocket::async_test]
    async fn invalidating_an_unknown_session_is_ok() {
        let repo = MockRepository::default();
        let config = config();
        let manager = SessionManager::new(&repo, &config);

        manager.invalidate_session("no-such-session").await.expect("must be idempotent");
    }

    #[rocket::async_test]
    async fn login_prunes_expired_sessions_of_the_user() {
        let (repo, user_id) = MockRepository::with_user("a@b.com", "correct", true);
        let config = config();
        let manager = SessionManager::new(&repo, &config);

        let stale = manager.create_session(&user_id).await.expect("create failed");
        repo.set_session_expiry(&stale.id, Utc::now() - Duration::days(1));

        let _fresh = manager.create_session(&user_id).await.expect("create failed");
        assert!(repo.session_expiry(&stale.id).is_none());
    }

    #[test]
    fn session_cookie_carries_the_configured_attributes() {
        let repo = MockRepository::default();
        let config = config();
        let manager = SessionManager::new(&repo, &config);

        let session = Session {
            id: "token".to_string(),
            user_id: Uuid::new_v4(),
            expires_at: Utc::now() + Duration::days(30),
        };
        let cookie = manager.create_session_cookie(&session);

        assert_eq!(cookie.name(), "auth_session");
        assert_eq!(cookie.value(), "token");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(rocket::http::SameSite::Lax));
        let expires = cookie.expires_datetime().expect("no expiry set");
        assert!(expires > OffsetDateTime::now_utc());
    }

    #[test]
    fn blank_cookie_is_empty_and_already_expired() {
        let repo = MockRepository::default();
        let config = config();
        let manager = SessionManager::new(&repo, &config);

        let cookie = manager.create_blank_session_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(rocket::time::Duration::ZERO));
        let expires = cookie.expires_datetime().expect("no expiry set");
        assert!(expires <= OffsetDateTime::now_utc());
    }
}
