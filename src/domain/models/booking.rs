use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub slot_id: String,
    pub attendee_name: String,
    pub attendee_email: String,
    pub is_waitlisted: bool,
    /// 1-based contiguous rank among live waitlisted bookings of the slot.
    pub waitlist_position: Option<i32>,
    pub promoted_from_waitlist_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub management_token: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        slot_id: String,
        attendee_name: String,
        attendee_email: String,
        waitlist_position: Option<i32>,
    ) -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            slot_id,
            attendee_name,
            attendee_email,
            is_waitlisted: waitlist_position.is_some(),
            waitlist_position,
            promoted_from_waitlist_at: None,
            cancelled_at: None,
            management_token: token,
            created_at: Utc::now(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled_at.is_some()
    }
}

/// Result of cancelling a booking: the cancelled row plus, when a confirmed
/// seat was freed and the event runs a waitlist, the promoted booking.
#[derive(Debug, Serialize)]
pub struct CancellationOutcome {
    pub cancelled: Booking,
    pub promoted: Option<Booking>,
}
