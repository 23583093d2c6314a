use crate::config::Config;
use crate::domain::ports::{
    BookingRepository, BusyBlockRepository, CalendarService, EmailService, EventRepository,
    HostRepository, JobRepository, SlotRepository,
};
use std::sync::Arc;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub host_repo: Arc<dyn HostRepository>,
    pub busy_repo: Arc<dyn BusyBlockRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub slot_repo: Arc<dyn SlotRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub calendar_service: Arc<dyn CalendarService>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
}
