use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingType {
    OneOnOne,
    Group,
    Collective,
    RoundRobin,
    Panel,
    Webinar,
}

impl MeetingType {
    pub fn parse(s: &str) -> Option<MeetingType> {
        match s {
            "ONE_ON_ONE" => Some(MeetingType::OneOnOne),
            "GROUP" => Some(MeetingType::Group),
            "COLLECTIVE" => Some(MeetingType::Collective),
            "ROUND_ROBIN" => Some(MeetingType::RoundRobin),
            "PANEL" => Some(MeetingType::Panel),
            "WEBINAR" => Some(MeetingType::Webinar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::OneOnOne => "ONE_ON_ONE",
            MeetingType::Group => "GROUP",
            MeetingType::Collective => "COLLECTIVE",
            MeetingType::RoundRobin => "ROUND_ROBIN",
            MeetingType::Panel => "PANEL",
            MeetingType::Webinar => "WEBINAR",
        }
    }

    /// Webinars may be announced on short notice.
    pub fn exempt_from_min_notice(&self) -> bool {
        matches!(self, MeetingType::Webinar)
    }

    /// Whether every participating host must be free for a candidate slot.
    pub fn requires_all_hosts(&self) -> bool {
        matches!(
            self,
            MeetingType::Collective | MeetingType::Panel | MeetingType::Webinar
        )
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub meeting_type: String,
    pub duration_min: i32,
    pub max_attendees: i32,
    pub min_notice_hours: i32,
    pub booking_window_days: i32,
    pub buffer_before_min: i32,
    pub buffer_after_min: i32,
    pub waitlist_enabled: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub meeting_type: MeetingType,
    pub duration_min: i32,
    pub max_attendees: i32,
    pub min_notice_hours: i32,
    pub booking_window_days: i32,
    pub buffer_before_min: i32,
    pub buffer_after_min: i32,
    pub waitlist_enabled: bool,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            slug: params.slug,
            title: params.title,
            description: params.description,
            location: params.location,
            meeting_type: params.meeting_type.as_str().to_string(),
            duration_min: params.duration_min,
            max_attendees: params.max_attendees,
            min_notice_hours: params.min_notice_hours,
            booking_window_days: params.booking_window_days,
            buffer_before_min: params.buffer_before_min,
            buffer_after_min: params.buffer_after_min,
            waitlist_enabled: params.waitlist_enabled,
            created_at: Utc::now(),
        }
    }

    pub fn meeting_type(&self) -> MeetingType {
        MeetingType::parse(&self.meeting_type).unwrap_or(MeetingType::OneOnOne)
    }
}
