use crate::domain::{
    models::{availability::AvailabilityPattern, host::Host},
    ports::HostRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresHostRepo {
    pool: PgPool,
}

impl PostgresHostRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HostRepository for PostgresHostRepo {
    async fn create(&self, host: &Host) -> Result<Host, AppError> {
        sqlx::query_as::<_, Host>(
            "INSERT INTO hosts (id, name, email, timezone, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&host.id).bind(&host.name).bind(&host.email).bind(&host.timezone).bind(host.created_at)
        .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Host>, AppError> {
        sqlx::query_as::<_, Host>("SELECT * FROM hosts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Host>, AppError> {
        sqlx::query_as::<_, Host>("SELECT * FROM hosts ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_patterns(&self, host_id: &str) -> Result<Vec<AvailabilityPattern>, AppError> {
        sqlx::query_as::<_, AvailabilityPattern>(
            "SELECT * FROM availability_patterns WHERE host_id = $1 ORDER BY day_of_week ASC, start_time ASC",
        )
        .bind(host_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn replace_patterns(
        &self,
        host_id: &str,
        patterns: &[AvailabilityPattern],
    ) -> Result<Vec<AvailabilityPattern>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM availability_patterns WHERE host_id = $1")
            .bind(host_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        for p in patterns {
            sqlx::query(
                "INSERT INTO availability_patterns (id, host_id, day_of_week, start_time, end_time, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&p.id).bind(&p.host_id).bind(p.day_of_week).bind(&p.start_time).bind(&p.end_time).bind(p.created_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        self.list_patterns(host_id).await
    }
}
