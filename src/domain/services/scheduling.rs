use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::domain::models::event::MeetingType;
use crate::domain::services::collective::{check_collective, select_round_robin_host, HostBusy};
use crate::domain::services::constraint::{check_candidate, RejectReason, SlotPolicy};
use crate::domain::services::interval::{intersect_sets, union_sets, Interval};

/// One participating host's resolved schedule over the queried range:
/// availability windows plus the merged busy set.
#[derive(Debug, Clone)]
pub struct HostSchedule {
    pub host_id: String,
    pub windows: Vec<Interval>,
    pub busy: Vec<Interval>,
}

/// Who serves an admitted candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// Every participating host (collective meeting types).
    AllHosts,
    /// The single host picked for this candidate.
    Host(String),
}

/// Admits or rejects one candidate interval against the participating hosts.
///
/// A host only counts as available when one of its windows fully covers the
/// candidate AND the constraint filter admits the candidate against its busy
/// set. Event-level policy rejections (notice, window) take precedence over
/// per-host attribution.
pub fn admit_candidate(
    candidate: Interval,
    meeting_type: MeetingType,
    schedules: &[HostSchedule],
    upcoming_counts: &HashMap<String, i64>,
    policy: &SlotPolicy,
    now: DateTime<Utc>,
) -> Result<Assignment, RejectReason> {
    check_candidate(candidate, &[], policy, now)?;

    let mut uncovered: Vec<String> = Vec::new();
    let mut covered: Vec<HostBusy> = Vec::new();
    for schedule in schedules {
        if schedule.windows.iter().any(|w| w.contains(&candidate)) {
            covered.push(HostBusy {
                host_id: schedule.host_id.clone(),
                busy: schedule.busy.clone(),
            });
        } else {
            uncovered.push(schedule.host_id.clone());
        }
    }

    if meeting_type.requires_all_hosts() {
        match check_collective(candidate, &covered, policy, now) {
            Ok(()) if uncovered.is_empty() => Ok(Assignment::AllHosts),
            Ok(()) => Err(RejectReason::HostUnavailable(sorted(uncovered))),
            Err(RejectReason::HostUnavailable(conflicting)) => {
                uncovered.extend(conflicting);
                Err(RejectReason::HostUnavailable(sorted(uncovered)))
            }
            Err(reason) => Err(reason),
        }
    } else {
        match select_round_robin_host(candidate, &covered, upcoming_counts, policy, now) {
            Some(host_id) => Ok(Assignment::Host(host_id)),
            None if covered.is_empty() => Err(RejectReason::HostUnavailable(sorted(uncovered))),
            None => Err(RejectReason::Conflict),
        }
    }
}

/// Enumerates admitted candidate slots over the hosts' windows, stepping by
/// the event duration from each window start. Collective types enumerate the
/// intersection of all hosts' windows, single-host types the union.
pub fn enumerate_candidates(
    meeting_type: MeetingType,
    schedules: &[HostSchedule],
    upcoming_counts: &HashMap<String, i64>,
    policy: &SlotPolicy,
    duration: Duration,
    now: DateTime<Utc>,
) -> Vec<(Interval, Assignment)> {
    let Some(first) = schedules.first() else {
        return Vec::new();
    };
    if duration <= Duration::zero() {
        return Vec::new();
    }

    let mut enumerable = first.windows.clone();
    for schedule in &schedules[1..] {
        enumerable = if meeting_type.requires_all_hosts() {
            intersect_sets(&enumerable, &schedule.windows)
        } else {
            union_sets(&enumerable, &schedule.windows)
        };
    }

    let mut out = Vec::new();
    for window in enumerable {
        let mut start = window.start;
        while start + duration <= window.end {
            let candidate = Interval::new(start, start + duration);
            if let Ok(assignment) = admit_candidate(
                candidate,
                meeting_type,
                schedules,
                upcoming_counts,
                policy,
                now,
            ) {
                out.push((candidate, assignment));
            }
            start += duration;
        }
    }
    out
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}
