use crate::domain::{
    models::busy::{BusyBlock, SOURCE_CALENDAR},
    ports::BusyBlockRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteBusyRepo {
    pool: SqlitePool,
}

impl SqliteBusyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusyBlockRepository for SqliteBusyRepo {
    async fn create(&self, block: &BusyBlock) -> Result<BusyBlock, AppError> {
        sqlx::query_as::<_, BusyBlock>(
            "INSERT INTO busy_blocks (id, host_id, start_time, end_time, source, created_at)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&block.id).bind(&block.host_id).bind(block.start_time).bind(block.end_time)
        .bind(&block.source).bind(block.created_at)
        .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_range(
        &self,
        host_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyBlock>, AppError> {
        sqlx::query_as::<_, BusyBlock>(
            "SELECT * FROM busy_blocks WHERE host_id = ? AND start_time < ? AND end_time > ? ORDER BY start_time ASC",
        )
        .bind(host_id).bind(end).bind(start)
        .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn replace_calendar_blocks(
        &self,
        host_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        blocks: &[BusyBlock],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query(
            "DELETE FROM busy_blocks WHERE host_id = ? AND source = ? AND start_time < ? AND end_time > ?",
        )
        .bind(host_id).bind(SOURCE_CALENDAR).bind(end).bind(start)
        .execute(&mut *tx).await.map_err(AppError::Database)?;

        for block in blocks {
            sqlx::query(
                "INSERT INTO busy_blocks (id, host_id, start_time, end_time, source, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&block.id).bind(&block.host_id).bind(block.start_time).bind(block.end_time)
            .bind(&block.source).bind(block.created_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
