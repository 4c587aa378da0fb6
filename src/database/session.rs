use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::session::{Session, SessionUser};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait SessionRepository {
    async fn insert_session(&self, session: &Session) -> Result<(), AppError>;
    /// Joined lookup: the session row together with its owning user.
    async fn find_session(&self, id: &str) -> Result<Option<(Session, SessionUser)>, AppError>;
    async fn update_session_expiry(&self, id: &str, expires_at: DateTime<Utc>) -> Result<(), AppError>;
    async fn delete_session(&self, id: &str) -> Result<(), AppError>;
    async fn delete_expired_sessions_for_user(&self, user_id: &Uuid) -> Result<(), AppError>;
}

#[derive(sqlx::FromRow)]
struct SessionUserRow {
    id: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    user_email: String,
    user_is_admin: bool,
}

#[async_trait::async_trait]
impl SessionRepository for PostgresRepository {
    async fn insert_session(&self, session: &Session) -> Result<(), AppError> {
        sqlx::query("INSERT INTO sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&session.id)
            .bind(session.user_id)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_session(&self, id: &str) -> Result<Option<(Session, SessionUser)>, AppError> {
        let row = sqlx::query_as::<_, SessionUserRow>(
            r#"
            SELECT s.id, s.user_id, s.expires_at, u.email AS user_email, u.is_admin AS user_is_admin
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let session = Session {
                id: row.id,
                user_id: row.user_id,
                expires_at: row.expires_at,
            };
            let user = SessionUser {
                id: row.user_id,
                email: row.user_email,
                is_admin: row.user_is_admin,
            };
            (session, user)
        }))
    }

    async fn update_session_expiry(&self, id: &str, expires_at: DateTime<Utc>) -> Result<(), AppError> {
        // Single UPDATE keyed on the id: concurrent rotations are
        // last-writer-wins and can never drop the row.
        sqlx::query("UPDATE sessions SET expires_at = $1 WHERE id = $2")
            .bind(expires_at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_session(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1").bind(id).execute(&self.pool).await?;

        Ok(())
    }

    async fn delete_expired_sessions_for_user(&self, user_id: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND expires_at <= now()")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
