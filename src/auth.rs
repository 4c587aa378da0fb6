use crate::config::Config;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::session::Session;
use crate::service::session::SessionManager;
use rocket::Data;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome as RequestOutcome, Request};
use serde::Serialize;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

/// Identity resolved from the session cookie, attached to the request.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

/// What the gate attached to this request: possibly-null identity plus the
/// raw session. Routes that render for everyone take this guard directly.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub user: Option<CurrentUser>,
    pub session: Option<Session>,
}

#[derive(Debug, Clone)]
enum GateOutcome {
    Resolved(AuthContext),
    /// The session store was unreachable. No identity is ever granted from
    /// this state; guards that need one turn it into a 500.
    StoreError(String),
}

impl Default for GateOutcome {
    fn default() -> Self {
        GateOutcome::Resolved(AuthContext::default())
    }
}

/// Per-request session gate. Reads the session cookie, resolves it against
/// the store, caches the identity for the guards below, and keeps the
/// client's cookie in sync: refreshed when the session was rotated, cleared
/// when a presented token turned out invalid. Requests without a cookie get
/// no cookie write at all.
pub struct SessionGate;

#[rocket::async_trait]
impl Fairing for SessionGate {
    fn info(&self) -> Info {
        Info {
            name: "Session Gate",
            kind: Kind::Request,
        }
    }

    async fn on_request(&self, req: &mut Request<'_>, _: &mut Data<'_>) {
        let outcome = resolve_session(req).await;
        req.local_cache(|| outcome);
    }
}

async fn resolve_session(req: &Request<'_>) -> GateOutcome {
    let Some(config) = req.rocket().state::<Config>() else {
        return GateOutcome::StoreError("configuration not managed".to_string());
    };

    let jar = req.cookies();
    let Some(cookie) = jar.get(&config.session.cookie_name) else {
        return GateOutcome::Resolved(AuthContext::default());
    };

    let Some(pool) = req.rocket().state::<PgPool>() else {
        return GateOutcome::StoreError("database pool not managed".to_string());
    };
    let repo = PostgresRepository::new(pool.clone());
    let manager = SessionManager::new(&repo, &config.session);

    match manager.validate_session(cookie.value()).await {
        Ok(Some(validated)) => {
            if validated.fresh {
                jar.add(manager.create_session_cookie(&validated.session));
            }
            GateOutcome::Resolved(AuthContext {
                user: Some(CurrentUser {
                    id: validated.user.id,
                    email: validated.user.email,
                    is_admin: validated.user.is_admin,
                }),
                session: Some(validated.session),
            })
        }
        Ok(None) => {
            // The token was presented but did not resolve; clear it.
            jar.add(manager.create_blank_session_cookie());
            GateOutcome::Resolved(AuthContext::default())
        }
        Err(e) => {
            error!(error = ?e, "session lookup failed, failing closed");
            GateOutcome::StoreError(e.to_string())
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthContext {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        match req.local_cache(GateOutcome::default) {
            GateOutcome::Resolved(context) => RequestOutcome::Success(context.clone()),
            GateOutcome::StoreError(message) => RequestOutcome::Error((
                Status::InternalServerError,
                AppError::SessionStore { message: message.clone() },
            )),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        match req.local_cache(GateOutcome::default) {
            GateOutcome::Resolved(context) => match &context.user {
                Some(user) => RequestOutcome::Success(user.clone()),
                None => RequestOutcome::Error((Status::Unauthorized, AppError::Unauthorized)),
            },
            GateOutcome::StoreError(message) => RequestOutcome::Error((
                Status::InternalServerError,
                AppError::SessionStore { message: message.clone() },
            )),
        }
    }
}

/// Guard for admin-only routes: 401 for anonymous callers, 403 for
/// authenticated non-admins.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        match CurrentUser::from_request(req).await {
            RequestOutcome::Success(user) if user.is_admin => RequestOutcome::Success(AdminUser(user)),
            RequestOutcome::Success(_) => RequestOutcome::Error((Status::Forbidden, AppError::Forbidden)),
            RequestOutcome::Error(e) => RequestOutcome::Error(e),
            RequestOutcome::Forward(f) => RequestOutcome::Forward(f),
        }
    }
}
