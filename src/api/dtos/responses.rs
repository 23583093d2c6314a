use crate::domain::models::{booking::Booking, event::Event, slot::Slot};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One admitted candidate slot. `host_id` carries the round-robin assignment
/// for single-host meeting types; collective candidates involve every host
/// and leave it unset.
#[derive(Debug, Serialize)]
pub struct CandidateSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_id: Option<String>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub event_id: String,
    pub slots: Vec<CandidateSlot>,
}

/// Open slot with its current occupancy.
#[derive(Serialize)]
pub struct SlotListing {
    #[serde(flatten)]
    pub slot: Slot,
    pub confirmed_count: i64,
    pub waitlisted_count: i64,
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub booking: Booking,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ManagedBookingResponse {
    pub booking: Booking,
    pub slot: Slot,
    pub event: Event,
}
