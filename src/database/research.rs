use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::research::{Research, ResearchRecord};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait ResearchRepository {
    async fn create_research(&self, record: &ResearchRecord) -> Result<Research, AppError>;
    async fn update_research(&self, id: &Uuid, record: &ResearchRecord) -> Result<Research, AppError>;
    async fn delete_research(&self, id: &Uuid) -> Result<(), AppError>;
    async fn get_research_by_id(&self, id: &Uuid) -> Result<Option<Research>, AppError>;
    /// All records, newest first; backs the public map/list page.
    async fn list_researches(&self) -> Result<Vec<Research>, AppError>;
    /// Seed-time bulk load: wipes the table and inserts the given records in
    /// one transaction.
    async fn replace_all_researches(&self, records: &[ResearchRecord]) -> Result<u64, AppError>;
}

const RESEARCH_COLUMNS: &str = "id, author, title, method, coordinates, summary, image, link, lat, lon, location, year, created_at";

#[async_trait::async_trait]
impl ResearchRepository for PostgresRepository {
    async fn create_research(&self, record: &ResearchRecord) -> Result<Research, AppError> {
        let research = sqlx::query_as::<_, Research>(&format!(
            r#"
            INSERT INTO researches (author, title, method, coordinates, summary, image, link, lat, lon, location, year)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {RESEARCH_COLUMNS}
            "#
        ))
        .bind(&record.author)
        .bind(&record.title)
        .bind(&record.method)
        .bind(&record.coordinates)
        .bind(&record.summary)
        .bind(&record.image)
        .bind(&record.link)
        .bind(&record.lat)
        .bind(&record.lon)
        .bind(&record.location)
        .bind(&record.year)
        .fetch_one(&self.pool)
        .await?;

        Ok(research)
    }

    async fn update_research(&self, id: &Uuid, record: &ResearchRecord) -> Result<Research, AppError> {
        let research = sqlx::query_as::<_, Research>(&format!(
            r#"
            UPDATE researches
            SET author = $1, title = $2, method = $3, coordinates = $4, summary = $5,
                image = $6, link = $7, lat = $8, lon = $9, location = $10, year = $11
            WHERE id = $12
            RETURNING {RESEARCH_COLUMNS}
            "#
        ))
        .bind(&record.author)
        .bind(&record.title)
        .bind(&record.method)
        .bind(&record.coordinates)
        .bind(&record.summary)
        .bind(&record.image)
        .bind(&record.link)
        .bind(&record.lat)
        .bind(&record.lon)
        .bind(&record.location)
        .bind(&record.year)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(research)
    }

    async fn delete_research(&self, id: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM researches WHERE id = $1").bind(id).execute(&self.pool).await?;

        Ok(())
    }

    async fn get_research_by_id(&self, id: &Uuid) -> Result<Option<Research>, AppError> {
        let research = sqlx::query_as::<_, Research>(&format!("SELECT {RESEARCH_COLUMNS} FROM researches WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(research)
    }

    async fn list_researches(&self) -> Result<Vec<Research>, AppError> {
        let researches = sqlx::query_as::<_, Research>(&format!(
            "SELECT {RESEARCH_COLUMNS} FROM researches ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(researches)
    }

    async fn replace_all_researches(&self, records: &[ResearchRecord]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM researches").execute(&mut *tx).await?;

        let mut inserted = 0u64;
        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO researches (author, title, method, coordinates, summary, image, link, lat, lon, location, year)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(&record.author)
            .bind(&record.title)
            .bind(&record.method)
            .bind(&record.coordinates)
            .bind(&record.summary)
            .bind(&record.image)
            .bind(&record.link)
            .bind(&record.lat)
            .bind(&record.lon)
            .bind(&record.location)
            .bind(&record.year)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;

        Ok(inserted)
    }
}
