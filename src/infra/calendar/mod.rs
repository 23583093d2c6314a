pub mod http_calendar_service;
