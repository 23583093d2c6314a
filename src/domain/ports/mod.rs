use crate::domain::models::{
    availability::AvailabilityPattern,
    booking::{Booking, CancellationOutcome},
    busy::BusyBlock,
    event::Event,
    host::Host,
    job::Job,
    slot::Slot,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait HostRepository: Send + Sync {
    async fn create(&self, host: &Host) -> Result<Host, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Host>, AppError>;
    async fn list(&self) -> Result<Vec<Host>, AppError>;
    async fn list_patterns(&self, host_id: &str) -> Result<Vec<AvailabilityPattern>, AppError>;
    /// Replaces the host's weekly patterns atomically.
    async fn replace_patterns(
        &self,
        host_id: &str,
        patterns: &[AvailabilityPattern],
    ) -> Result<Vec<AvailabilityPattern>, AppError>;
}

#[async_trait]
pub trait BusyBlockRepository: Send + Sync {
    async fn create(&self, block: &BusyBlock) -> Result<BusyBlock, AppError>;
    async fn list_by_range(
        &self,
        host_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyBlock>, AppError>;
    /// Replaces the cached CALENDAR rows inside the synced range in one
    /// transaction; MANUAL rows are untouched.
    async fn replace_calendar_blocks(
        &self,
        host_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        blocks: &[BusyBlock],
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event, host_ids: &[String]) -> Result<Event, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self) -> Result<Vec<Event>, AppError>;
    async fn list_host_ids(&self, event_id: &str) -> Result<Vec<String>, AppError>;
}

#[async_trait]
pub trait SlotRepository: Send + Sync {
    async fn create(&self, slot: &Slot) -> Result<Slot, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Slot>, AppError>;
    async fn list_open_by_event(&self, event_id: &str) -> Result<Vec<Slot>, AppError>;
    /// Non-cancelled slots assigned to the host overlapping the range.
    async fn list_by_host_range(
        &self,
        host_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Slot>, AppError>;
    /// Open future slots assigned to the host, for round-robin load ranking.
    async fn count_upcoming_by_host(
        &self,
        host_id: &str,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking and its outbox jobs in one transaction.
    async fn create(&self, booking: &Booking, jobs: Vec<Job>) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_slot(&self, slot_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn count_confirmed(&self, slot_id: &str) -> Result<i64, AppError>;
    async fn next_waitlist_position(&self, slot_id: &str) -> Result<i32, AppError>;
    /// Cancels the booking and, when a confirmed seat was freed and the
    /// waitlist is enabled, promotes the next in line and renumbers the
    /// remainder, all inside a single transaction together with the outbox
    /// jobs announcing the change.
    async fn cancel_and_promote(
        &self,
        booking_id: &str,
        waitlist_enabled: bool,
    ) -> Result<CancellationOutcome, AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<Job, AppError>;
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError>;
    async fn update_status(
        &self,
        id: &str,
        status: &str,
        error_message: Option<String>,
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Reads the provider's free/busy ranges for a host calendar.
    async fn fetch_busy(
        &self,
        host_email: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, AppError>;
    /// Adds an attendee to the provider-side event for a slot.
    async fn add_attendee(&self, slot: &Slot, event: &Event, email: &str)
        -> Result<(), AppError>;
    /// Removes an attendee from the provider-side event for a slot.
    async fn remove_attendee(&self, slot_id: &str, email: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachment_name: Option<&str>,
        attachment_data: Option<&[u8]>,
    ) -> Result<(), AppError>;
}
