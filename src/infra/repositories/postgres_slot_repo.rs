use crate::domain::{
    models::slot::{Slot, SLOT_CANCELLED, SLOT_OPEN},
    ports::SlotRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

pub struct PostgresSlotRepo {
    pool: PgPool,
}

impl PostgresSlotRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotRepository for PostgresSlotRepo {
    async fn create(&self, slot: &Slot) -> Result<Slot, AppError> {
        // The slots_host_no_overlap exclusion constraint turns a lost
        // check-then-insert race into a 23P01 database error here.
        sqlx::query_as::<_, Slot>(
            "INSERT INTO slots (id, event_id, start_time, end_time, assigned_host_id, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&slot.id).bind(&slot.event_id).bind(slot.start_time).bind(slot.end_time)
        .bind(&slot.assigned_host_id).bind(&slot.status).bind(slot.created_at)
        .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Slot>, AppError> {
        sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_open_by_event(&self, event_id: &str) -> Result<Vec<Slot>, AppError> {
        sqlx::query_as::<_, Slot>(
            "SELECT * FROM slots WHERE event_id = $1 AND status = $2 ORDER BY start_time ASC",
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
             WHERE s.status != $1 AND s.start_time < $2 AND s.end_time > $3
               AND (s.assigned_host_id = $4
                    OR (s.assigned_host_id IS NULL AND EXISTS (
                        SELECT 1 FROM event_hosts eh
                        WHERE eh.event_id = s.event_id AND eh.host_id = $4)))
             ORDER BY s.start_time ASC",
        )
        .bind(SLOT_CANCELLED).bind(end).bind(start).bind(host_id)
        .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_upcoming_by_host(
        &self,
        host_id: &str,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM slots WHERE assigned_host_id = $1 AND status = $2 AND start_time > $3",
        )
        .bind(host_id).bind(SLOT_OPEN).bind(now)
        .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
