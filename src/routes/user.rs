use crate::auth::{AuthContext, CurrentUser};
use crate::config::Config;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::{LoginRequest, UserResponse};
use crate::service::auth as auth_service;
use crate::service::session::SessionManager;
use rocket::http::{CookieJar, Status};
use rocket::serde::json::Json;
use rocket::serde::Serialize;
use rocket::{State, routes};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct MeResponse {
    pub user: Option<CurrentUser>,
}

#[rocket::post("/login", data = "<payload>")]
pub async fn post_login(
    pool: &State<PgPool>,
    config: &State<Config>,
    cookies: &CookieJar<'_>,
    payload: Json<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository::new(pool.inner().clone());
    let (user, session) = auth_service::login(&repo, &config.session, &payload.email, &payload.password).await?;

    let manager = SessionManager::new(&repo, &config.session);
    cookies.add(manager.create_session_cookie(&session));

    info!(user_id = %user.id, "login succeeded");
    Ok(Json(UserResponse::from(&user)))
}

#[rocket::post("/logout")]
pub async fn post_logout(
    pool: &State<PgPool>,
    config: &State<Config>,
    auth: AuthContext,
    cookies: &CookieJar<'_>,
) -> Result<Status, AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    let manager = SessionManager::new(&repo, &config.session);

    if let Some(session) = &auth.session {
        manager.invalidate_session(&session.id).await?;
        info!(user_id = %session.user_id, "logout");
    }
    cookies.add(manager.create_blank_session_cookie());

    Ok(Status::NoContent)
}

#[rocket::get("/me")]
pub async fn get_me(auth: AuthContext) -> Json<MeResponse> {
    Json(MeResponse { user: auth.user })
}

pub fn routes() -> Vec<rocket::Route> {
    routes![post_login, post_logout, get_me]
}
