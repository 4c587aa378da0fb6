use sqlx::PgPool;

/// Postgres-backed implementation of the repository traits. Cheap to clone;
/// constructed per request from the managed pool.
#[derive(Clone)]
pub struct PostgresRepository {
    pub pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
