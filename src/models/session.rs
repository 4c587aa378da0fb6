use chrono::{DateTime, Utc};
use rocket::serde::Serialize;
use uuid::Uuid;

/// A single row of the sessions table. The id is the opaque token handed to
/// the client; nothing else ever goes into the cookie.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(crate = "rocket::serde")]
pub struct Session {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// The slice of the owning user a validated session resolves to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
}
