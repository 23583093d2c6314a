pub mod availability;
pub mod busy;
pub mod calendar;
pub mod collective;
pub mod constraint;
pub mod interval;
pub mod scheduling;
pub mod waitlist;
