use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};
use connect_backend::{
    api::router::create_router,
    background::start_background_worker,
    config::Config,
    domain::models::{event::Event, slot::Slot},
    domain::ports::{CalendarService, EmailService},
    error::AppError,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo, sqlite_busy_repo::SqliteBusyRepo,
        sqlite_event_repo::SqliteEventRepo, sqlite_host_repo::SqliteHostRepo,
        sqlite_job_repo::SqliteJobRepo, sqlite_slot_repo::SqliteSlotRepo,
    },
    state::AppState,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tera::Tera;
use uuid::Uuid;

pub struct MockEmailService;

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(
        &self,
        _recipient: &str,
        _subject: &str,
        _html_body: &str,
        _attachment_name: Option<&str>,
        _attachment_data: Option<&[u8]>,
    ) -> Result<(), AppError> {
        Ok(())
    }
}

/// Calendar gateway stand-in. `fetch_busy` serves whatever ranges the test
/// loaded into `busy`; attendee updates are accepted and dropped.
pub struct MockCalendarService {
    pub busy: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl MockCalendarService {
    pub fn new() -> Self {
        Self {
            busy: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CalendarService for MockCalendarService {
    async fn fetch_busy(
        &self,
        _host_email: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, AppError> {
        let busy = self.busy.lock().unwrap();
        Ok(busy
            .iter()
            .filter(|(s, e)| *s < end && *e > start)
            .cloned()
            .collect())
    }

    async fn add_attendee(
        &self,
        _slot: &Slot,
        _event: &Event,
        _email: &str,
    ) -> Result<(), AppError> {
        Ok(())
    }

    async fn remove_attendee(&self, _slot_id: &str, _email: &str) -> Result<(), AppError> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub calendar: Arc<MockCalendarService>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template("confirmation.html", "<html>Confirmed {{ attendee_name }}</html>")
            .unwrap();
        tera.add_raw_template(
            "waitlisted.html",
            "<html>Waitlisted at {{ waitlist_position }}</html>",
        )
        .unwrap();
        tera.add_raw_template("cancellation.html", "<html>Cancelled</html>")
            .unwrap();
        tera.add_raw_template("promotion.html", "<html>Promoted</html>")
            .unwrap();
        let templates = Arc::new(tera);

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            default_timezone: "UTC".to_string(),
            frontend_url: "http://localhost".to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            calendar_service_url: "http://localhost".to_string(),
            calendar_service_token: "token".to_string(),
        };

        let calendar = Arc::new(MockCalendarService::new());

        let state = Arc::new(AppState {
            config: config.clone(),
            host_repo: Arc::new(SqliteHostRepo::new(pool.clone())),
            busy_repo: Arc::new(SqliteBusyRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            slot_repo: Arc::new(SqliteSlotRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
            calendar_service: calendar.clone(),
            email_service: Arc::new(MockEmailService),
            templates,
        });

        let worker_state = state.clone();
        tokio::spawn(async move {
            start_background_worker(worker_state).await;
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            calendar,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
