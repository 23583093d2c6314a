use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const SLOT_OPEN: &str = "OPEN";
pub const SLOT_CANCELLED: &str = "CANCELLED";

/// One concrete bookable occurrence of an event. Immutable once bookings
/// exist, apart from cancellation.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Slot {
    pub id: String,
    pub event_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub assigned_host_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Slot {
    pub fn new(
        event_id: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        assigned_host_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            start_time,
            end_time,
            assigned_host_id,
            status: SLOT_OPEN.to_string(),
            created_at: Utc::now(),
        }
    }
}
