pub mod availability;
pub mod booking;
pub mod busy;
pub mod event;
pub mod host;
pub mod job;
pub mod slot;
