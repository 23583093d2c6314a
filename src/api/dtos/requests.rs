use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateHostRequest {
    pub name: String,
    pub email: String,
    pub timezone: Option<String>,
}

#[derive(Deserialize)]
pub struct PatternInput {
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: i32,
    /// Local wall-clock "HH:MM".
    pub start_time: String,
    pub end_time: String,
}

#[derive(Deserialize)]
pub struct ReplacePatternsRequest {
    pub patterns: Vec<PatternInput>,
}

#[derive(Deserialize)]
pub struct CreateBusyBlockRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct SyncBusyRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub meeting_type: String,
    pub duration_min: i32,
    #[serde(default = "default_max_attendees")]
    pub max_attendees: i32,
    #[serde(default)]
    pub min_notice_hours: i32,
    #[serde(default = "default_booking_window_days")]
    pub booking_window_days: i32,
    #[serde(default)]
    pub buffer_before_min: i32,
    #[serde(default)]
    pub buffer_after_min: i32,
    #[serde(default)]
    pub waitlist_enabled: bool,
    pub host_ids: Vec<String>,
}

fn default_max_attendees() -> i32 {
    1
}

fn default_booking_window_days() -> i32 {
    60
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateSlotRequest {
    pub start_time: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct BookSlotRequest {
    pub name: String,
    pub email: String,
}
