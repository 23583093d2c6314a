use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::models::event::Event;
use crate::domain::services::interval::Interval;

/// Why a candidate slot was turned down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    TooSoon,
    OutsideWindow,
    Conflict,
    HostUnavailable(Vec<String>),
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::TooSoon => "TOO_SOON",
            RejectReason::OutsideWindow => "OUTSIDE_WINDOW",
            RejectReason::Conflict => "CONFLICT",
            RejectReason::HostUnavailable(_) => "HOST_UNAVAILABLE",
        }
    }

    pub fn message(&self) -> String {
        match self {
            RejectReason::TooSoon => "Slot starts before the minimum notice period".into(),
            RejectReason::OutsideWindow => "Slot starts beyond the booking window".into(),
            RejectReason::Conflict => "Slot conflicts with existing busy time".into(),
            RejectReason::HostUnavailable(hosts) => {
                format!("Unavailable host(s): {}", hosts.join(", "))
            }
        }
    }
}

/// Event-level booking policy applied to every candidate slot.
#[derive(Debug, Clone)]
pub struct SlotPolicy {
    pub min_notice_hours: i64,
    pub booking_window_days: i64,
    pub buffer_before: Duration,
    pub buffer_after: Duration,
    pub exempt_from_notice: bool,
}

impl SlotPolicy {
    pub fn for_event(event: &Event) -> Self {
        Self {
            min_notice_hours: event.min_notice_hours as i64,
            booking_window_days: event.booking_window_days as i64,
            buffer_before: Duration::minutes(event.buffer_before_min as i64),
            buffer_after: Duration::minutes(event.buffer_after_min as i64),
            exempt_from_notice: event.meeting_type().exempt_from_min_notice(),
        }
    }
}

/// Pure admit/reject predicate for one candidate against one host's merged
/// busy set. Checks run in order and short-circuit: notice, window, conflict.
/// `busy` must be sorted and merged (see the busy aggregator); the scan exits
/// early once blocks start past the buffered candidate.
pub fn check_candidate(
    candidate: Interval,
    busy: &[Interval],
    policy: &SlotPolicy,
    now: DateTime<Utc>,
) -> Result<(), RejectReason> {
    if !policy.exempt_from_notice && candidate.start < now + Duration::hours(policy.min_notice_hours)
    {
        return Err(RejectReason::TooSoon);
    }

    if candidate.start > now + Duration::days(policy.booking_window_days) {
        return Err(RejectReason::OutsideWindow);
    }

    // Half-open envelope: a candidate whose buffered range ends exactly at a
    // busy start (or starts exactly at a busy end) is admitted.
    let envelope = candidate.expand(policy.buffer_before, policy.buffer_after);
    for block in busy {
        if block.start >= envelope.end {
            break;
        }
        if envelope.overlaps(block) {
            return Err(RejectReason::Conflict);
        }
    }

    Ok(())
}
