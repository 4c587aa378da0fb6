use crate::config::SessionConfig;
use crate::database::session::SessionRepository;
use crate::database::user::UserRepository;
use crate::error::app_error::AppError;
use crate::models::session::Session;
use crate::models::user::User;
use crate::service::password;
use crate::service::session::SessionManager;

/// Checks credentials against the store and, on success, opens a session.
///
/// Unknown emails and wrong passwords both come back as the same
/// `InvalidCredentials`, and the unknown-email branch burns an equivalent
/// Argon2 verification so the two are not separable by timing either.
pub async fn login<R>(repo: &R, session_config: &SessionConfig, email: &str, password: &str) -> Result<(User, Session), AppError>
where
    R: UserRepository + SessionRepository,
{
    let Some(user) = repo.get_user_by_email(email.trim()).await? else {
        password::dummy_verify(password);
        return Err(AppError::InvalidCredentials);
    };

    if !password::verify_password(&user.password_hash, password) {
        return Err(AppError::InvalidCredentials);
    }

    let manager = SessionManager::new(repo, session_config);
    let session = manager.create_session(&user.id).await?;

    Ok((user, session))
}
