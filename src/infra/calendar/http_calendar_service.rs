use crate::domain::{
    models::{event::Event, slot::Slot},
    ports::CalendarService,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Client for the calendar gateway that fronts the hosts' provider
/// calendars (free/busy reads and attendee updates).
pub struct HttpCalendarService {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpCalendarService {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }

    async fn post_json<T: Serialize>(&self, path: &str, payload: &T) -> Result<reqwest::Response, AppError> {
        let res = self
            .client
            .post(format!("{}{}", self.api_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Calendar service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Calendar service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }
        Ok(res)
    }
}

#[derive(Serialize)]
struct FreeBusyRequest {
    calendar_email: String,
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
}

#[derive(Deserialize)]
struct FreeBusyRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct FreeBusyResponse {
    busy: Vec<FreeBusyRange>,
}

#[derive(Serialize)]
struct AttendeeRequest {
    external_ref: String,
    attendee_email: String,
}

#[derive(Serialize)]
struct EventUpsertRequest {
    external_ref: String,
    summary: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    attendee_email: String,
}

#[async_trait]
impl CalendarService for HttpCalendarService {
    async fn fetch_busy(
        &self,
        host_email: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, AppError> {
        let res = self
            .post_json(
                "/freebusy",
                &FreeBusyRequest {
                    calendar_email: host_email.to_string(),
                    time_min: start,
                    time_max: end,
                },
            )
            .await?;

        let body: FreeBusyResponse = res.json().await.map_err(|e| {
            AppError::InternalWithMsg(format!("Calendar service returned malformed free/busy: {}", e))
        })?;
        Ok(body.busy.into_iter().map(|r| (r.start, r.end)).collect())
    }

    async fn add_attendee(
        &self,
        slot: &Slot,
        event: &Event,
        email: &str,
    ) -> Result<(), AppError> {
        self.post_json(
            "/events/attendees/add",
            &EventUpsertRequest {
                external_ref: slot.id.clone(),
                summary: event.title.clone(),
                start_time: slot.start_time,
                end_time: slot.end_time,
                attendee_email: email.to_string(),
            },
        )
        .await?;
        Ok(())
    }

    async fn remove_attendee(&self, slot_id: &str, email: &str) -> Result<(), AppError> {
        self.post_json(
            "/events/attendees/remove",
            &AttendeeRequest {
                external_ref: slot_id.to_string(),
                attendee_email: email.to_string(),
            },
        )
        .await?;
        Ok(())
    }
}
