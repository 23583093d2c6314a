use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One weekly recurring availability window for a host.
/// `day_of_week` uses 0 = Sunday .. 6 = Saturday; `start_time`/`end_time`
/// are local wall-clock "HH:MM" bounds in the host's timezone.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AvailabilityPattern {
    pub id: String,
    pub host_id: String,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
}

impl AvailabilityPattern {
    pub fn new(host_id: String, day_of_week: i32, start_time: String, end_time: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            host_id,
            day_of_week,
            start_time,
            end_time,
            created_at: Utc::now(),
        }
    }
}
