use crate::domain::models::{booking::Booking, event::Event, slot::Slot};
use crate::domain::services::availability::resolve_timezone;
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};

pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting outbox worker...");

    loop {
        match state.job_repo.find_pending(10).await {
            Ok(jobs) => {
                for job in jobs {
                    let span = info_span!(
                        "outbox_job",
                        job_id = %job.id,
                        job_type = %job.job_type,
                        booking_id = %job.payload.booking_id
                    );

                    let state = state.clone();
                    async move {
                        info!("Processing job: {}", job.job_type);
                        match process_job(&state, &job).await {
                            Ok(_) => {
                                info!("Job completed successfully");
                                if let Err(e) =
                                    state.job_repo.update_status(&job.id, "COMPLETED", None).await
                                {
                                    error!("Failed to mark job as completed: {:?}", e);
                                }
                            }
                            Err(e) => {
                                let err_msg = format!("{}", e);
                                error!("Job failed with error: {}", err_msg);
                                if let Err(up_err) = state
                                    .job_repo
                                    .update_status(&job.id, "FAILED", Some(err_msg))
                                    .await
                                {
                                    error!("Failed to mark job as failed: {:?}", up_err);
                                }
                            }
                        }
                    }
                    .instrument(span)
                    .await;
                }
            }
            Err(e) => error!("Failed to fetch pending jobs: {:?}", e),
        }
        sleep(Duration::from_secs(5)).await;
    }
}

struct JobContext {
    booking: Booking,
    slot: Slot,
    event: Event,
}

async fn process_job(
    state: &Arc<AppState>,
    job: &crate::domain::models::job::Job,
) -> Result<(), AppError> {
    let booking_id = &job.payload.booking_id;
    let ctx = fetch_job_context(state, booking_id).await?;

    match job.job_type.as_str() {
        "CONFIRMATION" => {
            let html = render_template(state, "confirmation.html", &ctx, None)?;
            let ics = generate_ics(&ctx.event, &ctx.slot, &ctx.booking);
            let subject = format!("Booking confirmed: {}", ctx.event.title);
            state
                .email_service
                .send(
                    &ctx.booking.attendee_email,
                    &subject,
                    &html,
                    Some("invite.ics"),
                    Some(ics.as_bytes()),
                )
                .await
        }
        "WAITLISTED" => {
            let html = render_template(
                state,
                "waitlisted.html",
                &ctx,
                ctx.booking.waitlist_position,
            )?;
            let subject = format!("You're on the waitlist for {}", ctx.event.title);
            state
                .email_service
                .send(&ctx.booking.attendee_email, &subject, &html, None, None)
                .await
        }
        "CANCELLATION" => {
            let html = render_template(state, "cancellation.html", &ctx, None)?;
            let subject = format!("Booking cancelled: {}", ctx.event.title);
            state
                .email_service
                .send(&ctx.booking.attendee_email, &subject, &html, None, None)
                .await
        }
        "PROMOTION" => {
            let html = render_template(state, "promotion.html", &ctx, None)?;
            let ics = generate_ics(&ctx.event, &ctx.slot, &ctx.booking);
            let subject = format!("A seat opened up: {}", ctx.event.title);
            state
                .email_service
                .send(
                    &ctx.booking.attendee_email,
                    &subject,
                    &html,
                    Some("invite.ics"),
                    Some(ics.as_bytes()),
                )
                .await
        }
        "CALENDAR_ADD" => {
            state
                .calendar_service
                .add_attendee(&ctx.slot, &ctx.event, &ctx.booking.attendee_email)
                .await
        }
        "CALENDAR_REMOVE" => {
            state
                .calendar_service
                .remove_attendee(&ctx.slot.id, &ctx.booking.attendee_email)
                .await
        }
        other => Err(AppError::InternalWithMsg(format!(
            "Unknown job type: {}",
            other
        ))),
    }
}

async fn fetch_job_context(
    state: &Arc<AppState>,
    booking_id: &str,
) -> Result<JobContext, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(booking_id)
        .await?
        .ok_or(AppError::NotFound(format!("Booking {} not found", booking_id)))?;
    let slot = state
        .slot_repo
        .find_by_id(&booking.slot_id)
        .await?
        .ok_or(AppError::NotFound(format!("Slot {} not found", booking.slot_id)))?;
    let event = state
        .event_repo
        .find_by_id(&slot.event_id)
        .await?
        .ok_or(AppError::NotFound(format!("Event {} not found", slot.event_id)))?;
    Ok(JobContext {
        booking,
        slot,
        event,
    })
}

fn render_template(
    state: &Arc<AppState>,
    template: &str,
    ctx: &JobContext,
    waitlist_position: Option<i32>,
) -> Result<String, AppError> {
    let tz = resolve_timezone(None, &state.config.default_timezone);
    let local_start = ctx.slot.start_time.with_timezone(&tz);

    let mut context = tera::Context::new();
    context.insert("attendee_name", &ctx.booking.attendee_name);
    context.insert("event_title", &ctx.event.title);
    context.insert(
        "slot_start",
        &format!("{} ({})", local_start.format("%Y-%m-%d %H:%M"), tz.name()),
    );
    context.insert("location", &ctx.event.location);
    let manage_url = format!(
        "{}/manage/{}",
        state.config.frontend_url, ctx.booking.management_token
    );
    context.insert("manage_url", &manage_url);
    if let Some(pos) = waitlist_position {
        context.insert("waitlist_position", &pos);
    }

    state
        .templates
        .render(template, &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))
}
