use crate::domain::{
    models::slot::{Slot, SLOT_CANCELLED, SLOT_OPEN},
    ports::SlotRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

pub struct SqliteSlotRepo {
    pool: SqlitePool,
}

impl SqliteSlotRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotRepository for SqliteSlotRepo {
    async fn create(&self, slot: &Slot) -> Result<Slot, AppError> {
        sqlx::query_as::<_, Slot>(
            "INSERT INTO slots (id, event_id, start_time, end_time, assigned_host_id, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&slot.id).bind(&slot.event_id).bind(slot.start_time).bind(slot.end_time)
        .bind(&slot.assigned_host_id).bind(&slot.status).bind(slot.created_at)
        .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Slot>, AppError> {
        sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_open_by_event(&self, event_id: &str) -> Result<Vec<Slot>, AppError> {
        sqlx::query_as::<_, Slot>(
            "SELECT * FROM slots WHERE event_id = ? AND status = ? ORDER BY start_time ASC",
        )
        .bind(event_id)
        .bind(SLOT_OPEN)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_by_host_range(
        &self,
        host_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Slot>, AppError> {
        // Collective slots carry no assignee and occupy every event host.
        sqlx::query_as::<_, Slot>(
            "SELECT s.* FROM slots s
             WHERE s.status != ? AND s.start_time < ? AND s.end_time > ?
               AND (s.assigned_host_id = ?
                    OR (s.assigned_host_id IS NULL AND EXISTS (
                        SELECT 1 FROM event_hosts eh
                        WHERE eh.event_id = s.event_id AND eh.host_id = ?)))
             ORDER BY s.start_time ASC",
        )
        .bind(SLOT_CANCELLED).bind(end).bind(start).bind(host_id).bind(host_id)
        .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_upcoming_by_host(
        &self,
        host_id: &str,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM slots WHERE assigned_host_id = ? AND status = ? AND start_time > ?",
        )
        .bind(host_id).bind(SLOT_OPEN).bind(now)
        .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
