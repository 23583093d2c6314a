use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event, host_ids: &[String]) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, slug, title, description, location, meeting_type, duration_min, max_attendees, min_notice_hours, booking_window_days, buffer_before_min, buffer_after_min, waitlist_enabled, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&event.id).bind(&event.slug).bind(&event.title).bind(&event.description)
        .bind(&event.location).bind(&event.meeting_type).bind(event.duration_min)
        .bind(event.max_attendees).bind(event.min_notice_hours).bind(event.booking_window_days)
        .bind(event.buffer_before_min).bind(event.buffer_after_min).bind(event.waitlist_enabled)
        .bind(event.created_at)
        .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for host_id in host_ids {
            sqlx::query("INSERT INTO event_hosts (event_id, host_id) VALUES (?, ?)")
                .bind(&event.id)
                .bind(host_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_host_ids(&self, event_id: &str) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query("SELECT host_id FROM event_hosts WHERE event_id = ? ORDER BY host_id ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(rows.iter().map(|r| r.get::<String, _>("host_id")).collect())
    }
}
