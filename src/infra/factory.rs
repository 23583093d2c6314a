use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tera::Tera;
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::infra::calendar::http_calendar_service::HttpCalendarService;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_busy_repo::PostgresBusyRepo,
    postgres_event_repo::PostgresEventRepo, postgres_host_repo::PostgresHostRepo,
    postgres_job_repo::PostgresJobRepo, postgres_slot_repo::PostgresSlotRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_busy_repo::SqliteBusyRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_host_repo::SqliteHostRepo,
    sqlite_job_repo::SqliteJobRepo, sqlite_slot_repo::SqliteSlotRepo,
};
use crate::state::AppState;

pub fn load_templates() -> Arc<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_template(
        "confirmation.html",
        include_str!("../templates/confirmation.html"),
    )
    .expect("Failed to load confirmation template");
    tera.add_raw_template(
        "waitlisted.html",
        include_str!("../templates/waitlisted.html"),
    )
    .expect("Failed to load waitlisted template");
    tera.add_raw_template(
        "cancellation.html",
        include_str!("../templates/cancellation.html"),
    )
    .expect("Failed to load cancellation template");
    tera.add_raw_template(
        "promotion.html",
        include_str!("../templates/promotion.html"),
    )
    .expect("Failed to load promotion template");
    Arc::new(tera)
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let calendar_service = Arc::new(HttpCalendarService::new(
        config.calendar_service_url.clone(),
        config.calendar_service_token.clone(),
    ));
    let templates = load_templates();

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            host_repo: Arc::new(PostgresHostRepo::new(pool.clone())),
            busy_repo: Arc::new(PostgresBusyRepo::new(pool.clone())),
            event_repo: Arc::new(PostgresEventRepo::new(pool.clone())),
            slot_repo: Arc::new(PostgresSlotRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            job_repo: Arc::new(PostgresJobRepo::new(pool.clone())),
            calendar_service,
            email_service,
            templates,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            host_repo: Arc::new(SqliteHostRepo::new(pool.clone())),
            busy_repo: Arc::new(SqliteBusyRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            slot_repo: Arc::new(SqliteSlotRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
            calendar_service,
            email_service,
            templates,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
