use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateHostRequest, ReplacePatternsRequest};
use crate::domain::models::{availability::AvailabilityPattern, host::Host};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_host(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateHostRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(tz) = payload.timezone.as_deref() {
        if tz.parse::<chrono_tz::Tz>().is_err() {
            return Err(AppError::Validation(format!("Unknown timezone: {}", tz)));
        }
    }

    let host = Host::new(payload.name, payload.email, payload.timezone);
    let created = state.host_repo.create(&host).await?;
    info!("Host created: {}", created.id);
    Ok(Json(created))
}

pub async fn list_hosts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let hosts = state.host_repo.list().await?;
    Ok(Json(hosts))
}

pub async fn get_host(
    State(state): State<Arc<AppState>>,
    Path(host_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let host = state
        .host_repo
        .find_by_id(&host_id)
        .await?
        .ok_or(AppError::NotFound("Host not found".into()))?;
    Ok(Json(host))
}

pub async fn get_patterns(
    State(state): State<Arc<AppState>>,
    Path(host_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state
        .host_repo
        .find_by_id(&host_id)
        .await?
        .ok_or(AppError::NotFound("Host not found".into()))?;
    let patterns = state.host_repo.list_patterns(&host_id).await?;
    Ok(Json(patterns))
}

pub async fn replace_patterns(
    State(state): State<Arc<AppState>>,
    Path(host_id): Path<String>,
    Json(payload): Json<ReplacePatternsRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .host_repo
        .find_by_id(&host_id)
        .await?
        .ok_or(AppError::NotFound("Host not found".into()))?;

    let mut patterns = Vec::with_capacity(payload.patterns.len());
    for p in payload.patterns {
        if !(0..=6).contains(&p.day_of_week) {
            return Err(AppError::Validation(
                "day_of_week must be 0 (Sunday) through 6 (Saturday)".into(),
            ));
        }
        let start = chrono::NaiveTime::parse_from_str(&p.start_time, "%H:%M")
            .map_err(|_| AppError::Validation("start_time must be HH:MM".into()))?;
        let end = chrono::NaiveTime::parse_from_str(&p.end_time, "%H:%M")
            .map_err(|_| AppError::Validation("end_time must be HH:MM".into()))?;
        if end <= start {
            return Err(AppError::Validation(
                "end_time must be after start_time".into(),
            ));
        }
        patterns.push(AvailabilityPattern::new(
            host_id.clone(),
            p.day_of_week,
            p.start_time,
            p.end_time,
        ));
    }

    let saved = state.host_repo.replace_patterns(&host_id, &patterns).await?;
    info!("Replaced {} availability patterns for host {}", saved.len(), host_id);
    Ok(Json(saved))
}
