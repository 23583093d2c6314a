use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Fallback IANA timezone for hosts without one configured.
    pub default_timezone: String,
    /// Public base URL used when building management links in emails.
    pub frontend_url: String,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub calendar_service_url: String,
    pub calendar_service_token: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            default_timezone: env::var("DEFAULT_TIMEZONE").unwrap_or_else(|_| "America/New_York".to_string()),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string()),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            calendar_service_url: env::var("CALENDAR_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8100/api/v1".to_string()),
            calendar_service_token: env::var("CALENDAR_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
        }
    }
}
