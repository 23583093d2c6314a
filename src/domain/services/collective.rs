use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::services::constraint::{check_candidate, RejectReason, SlotPolicy};
use crate::domain::services::interval::Interval;

/// One participating host's merged busy set.
#[derive(Debug, Clone)]
pub struct HostBusy {
    pub host_id: String,
    pub busy: Vec<Interval>,
}

/// Admits a candidate iff the constraint filter admits it for every
/// participating host independently. Policy fields are event-level and
/// shared; busy sets and buffers are evaluated per host. On rejection the
/// blocking host ids are reported so the caller can name them.
pub fn check_collective(
    candidate: Interval,
    hosts: &[HostBusy],
    policy: &SlotPolicy,
    now: DateTime<Utc>,
) -> Result<(), RejectReason> {
    let mut blocking: Vec<String> = Vec::new();
    let mut policy_reject: Option<RejectReason> = None;

    for host in hosts {
        match check_candidate(candidate, &host.busy, policy, now) {
            Ok(()) => {}
            Err(RejectReason::Conflict) => blocking.push(host.host_id.clone()),
            // Notice/window rejections are event-level, identical for every
            // host; keep the first one.
            Err(reason) => {
                policy_reject.get_or_insert(reason);
            }
        }
    }

    if let Some(reason) = policy_reject {
        return Err(reason);
    }
    if !blocking.is_empty() {
        return Err(RejectReason::HostUnavailable(blocking));
    }
    Ok(())
}

/// Round-robin host assignment: among hosts whose own busy set admits the
/// candidate, picks the one with the fewest upcoming assigned slots. Ties
/// break on host id so repeated calls are deterministic.
pub fn select_round_robin_host(
    candidate: Interval,
    hosts: &[HostBusy],
    upcoming_counts: &HashMap<String, i64>,
    policy: &SlotPolicy,
    now: DateTime<Utc>,
) -> Option<String> {
    hosts
        .iter()
        .filter(|h| check_candidate(candidate, &h.busy, policy, now).is_ok())
        .min_by_key(|h| {
            (
                upcoming_counts.get(&h.host_id).copied().unwrap_or(0),
                h.host_id.clone(),
            )
        })
        .map(|h| h.host_id.clone())
}
