use crate::domain::{
    models::{
        booking::{Booking, CancellationOutcome},
        job::Job,
    },
    ports::BookingRepository,
    services::waitlist,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::info;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_job(tx: &mut Transaction<'_, Postgres>, job: &Job) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO jobs (id, job_type, payload, execute_at, status, error_message, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&job.id).bind(&job.job_type).bind(&job.payload).bind(job.execute_at)
    .bind(&job.status).bind(&job.error_message).bind(job.created_at)
    .execute(&mut **tx).await.map_err(AppError::Database)?;
    Ok(())
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking, jobs: Vec<Job>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, slot_id, attendee_name, attendee_email, is_waitlisted, waitlist_position, promoted_from_waitlist_at, cancelled_at, management_token, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(&booking.id).bind(&booking.slot_id).bind(&booking.attendee_name)
        .bind(&booking.attendee_email).bind(booking.is_waitlisted).bind(booking.waitlist_position)
        .bind(booking.promoted_from_waitlist_at).bind(booking.cancelled_at)
        .bind(&booking.management_token).bind(booking.created_at)
        .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for job in &jobs {
            insert_job(&mut tx, job).await?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE management_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_slot(&self, slot_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE slot_id = $1 AND cancelled_at IS NULL ORDER BY created_at ASC",
        )
        .bind(slot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn count_confirmed(&self, slot_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM bookings WHERE slot_id = $1 AND cancelled_at IS NULL AND is_waitlisted = FALSE",
        )
        .bind(slot_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn next_waitlist_position(&self, slot_id: &str) -> Result<i32, AppError> {
        let row = sqlx::query(
            "SELECT COALESCE(MAX(waitlist_position), 0) as max_pos FROM bookings WHERE slot_id = $1 AND cancelled_at IS NULL AND is_waitlisted = TRUE",
        )
        .bind(slot_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(row.get::<i32, _>("max_pos") + 1)
    }

    async fn cancel_and_promote(
        &self,
        booking_id: &str,
        waitlist_enabled: bool,
    ) -> Result<CancellationOutcome, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let now = Utc::now();

        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        if booking.is_cancelled() {
            return Ok(CancellationOutcome {
                cancelled: booking,
                promoted: None,
            });
        }
        let freed_confirmed_seat = !booking.is_waitlisted;

        let cancelled = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET cancelled_at = $1, waitlist_position = NULL WHERE id = $2 RETURNING *",
        )
        .bind(now)
        .bind(booking_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        insert_job(&mut tx, &Job::new("CANCELLATION", cancelled.id.clone(), now)).await?;
        if freed_confirmed_seat {
            insert_job(&mut tx, &Job::new("CALENDAR_REMOVE", cancelled.id.clone(), now)).await?;
        }

        let mut promoted = None;
        if freed_confirmed_seat && waitlist_enabled {
            let waiting = sqlx::query_as::<_, Booking>(
                "SELECT * FROM bookings WHERE slot_id = $1 AND cancelled_at IS NULL AND is_waitlisted = TRUE ORDER BY waitlist_position ASC FOR UPDATE",
            )
            .bind(&booking.slot_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;

            if let Some(head) = waitlist::next_in_line(&waiting) {
                let row = sqlx::query_as::<_, Booking>(
                    "UPDATE bookings SET is_waitlisted = FALSE, waitlist_position = NULL, promoted_from_waitlist_at = $1 WHERE id = $2 RETURNING *",
                )
                .bind(now)
                .bind(&head.id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;

                insert_job(&mut tx, &Job::new("PROMOTION", row.id.clone(), now)).await?;
                insert_job(&mut tx, &Job::new("CALENDAR_ADD", row.id.clone(), now)).await?;
                info!("Promoted booking {} from waitlist", row.id);
                promoted = Some(row);
            }
        }

        let remaining = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE slot_id = $1 AND cancelled_at IS NULL AND is_waitlisted = TRUE ORDER BY waitlist_position ASC",
        )
        .bind(&booking.slot_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        for change in waitlist::renumber(&remaining) {
            sqlx::query("UPDATE bookings SET waitlist_position = $1 WHERE id = $2")
                .bind(change.position)
                .bind(&change.booking_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(CancellationOutcome { cancelled, promoted })
    }
}
