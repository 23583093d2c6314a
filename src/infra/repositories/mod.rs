pub mod postgres_booking_repo;
pub mod postgres_busy_repo;
pub mod postgres_event_repo;
pub mod postgres_host_repo;
pub mod postgres_job_repo;
pub mod postgres_slot_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_busy_repo;
pub mod sqlite_event_repo;
pub mod sqlite_host_repo;
pub mod sqlite_job_repo;
pub mod sqlite_slot_repo;
