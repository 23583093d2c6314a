use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const SOURCE_CALENDAR: &str = "CALENDAR";
pub const SOURCE_MANUAL: &str = "MANUAL";

/// Cached interval during which a host is unavailable. `CALENDAR` rows are a
/// snapshot of the external provider's free/busy data, refreshed on sync and
/// stale in between; `MANUAL` rows are entered by the host.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BusyBlock {
    pub id: String,
    pub host_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl BusyBlock {
    pub fn new(
        host_id: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        source: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            host_id,
            start_time,
            end_time,
            source: source.to_string(),
            created_at: Utc::now(),
        }
    }
}
