use crate::auth::AdminUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::database::research::ResearchRepository;
use crate::error::app_error::AppError;
use crate::models::research::{Research, ResearchRecord, ResearchRequest};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, routes};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[rocket::get("/")]
pub async fn list_researches(pool: &State<PgPool>) -> Result<Json<Vec<Research>>, AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    let researches = repo.list_researches().await?;
    Ok(Json(researches))
}

#[rocket::post("/", data = "<payload>")]
pub async fn create_research(
    pool: &State<PgPool>,
    _admin: AdminUser,
    payload: Json<ResearchRequest>,
) -> Result<(Status, Json<Research>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository::new(pool.inner().clone());
    let record = ResearchRecord::from(&*payload);
    let research = repo.create_research(&record).await?;
    Ok((Status::Created, Json(research)))
}

#[rocket::put("/<id>", data = "<payload>")]
pub async fn put_research(
    pool: &State<PgPool>,
    _admin: AdminUser,
    id: &str,
    payload: Json<ResearchRequest>,
) -> Result<Json<Research>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository::new(pool.inner().clone());
    let uuid = Uuid::parse_str(id)?;
    let record = ResearchRecord::from(&*payload);
    let research = repo.update_research(&uuid, &record).await?;
    Ok(Json(research))
}

#[rocket::delete("/<id>")]
pub async fn delete_research(pool: &State<PgPool>, _admin: AdminUser, id: &str) -> Result<Status, AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    let uuid = Uuid::parse_str(id)?;
    repo.delete_research(&uuid).await?;
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_researches, create_research, put_research, delete_research]
}
