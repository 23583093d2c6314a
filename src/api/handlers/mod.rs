pub mod booking;
pub mod booking_management;
pub mod busy;
pub mod event;
pub mod health;
pub mod host;
pub mod slot;
