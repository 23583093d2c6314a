use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Host {
    pub id: String,
    pub name: String,
    pub email: String,
    /// IANA timezone name. Hosts without one fall back to the configured
    /// service default when availability is resolved.
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Host {
    pub fn new(name: String, email: String, timezone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            timezone,
            created_at: Utc::now(),
        }
    }
}
