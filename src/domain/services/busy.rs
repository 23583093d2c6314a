use chrono::Duration;

use crate::domain::models::busy::BusyBlock;
use crate::domain::models::slot::Slot;
use crate::domain::services::interval::{merge_intervals, Interval};

/// A booked slot together with the owning event's buffers, as it occupies a
/// host's calendar.
#[derive(Debug, Clone)]
pub struct BufferedSlot {
    pub interval: Interval,
    pub buffer_before: Duration,
    pub buffer_after: Duration,
}

impl BufferedSlot {
    pub fn from_slot(slot: &Slot, buffer_before_min: i32, buffer_after_min: i32) -> Self {
        Self {
            interval: Interval::new(slot.start_time, slot.end_time),
            buffer_before: Duration::minutes(buffer_before_min as i64),
            buffer_after: Duration::minutes(buffer_after_min as i64),
        }
    }
}

/// Merges a host's cached busy blocks with their booked slots (each widened
/// by the owning event's buffers) into one sorted union with no overlapping
/// or touching intervals.
pub fn aggregate_busy(blocks: &[BusyBlock], slots: &[BufferedSlot]) -> Vec<Interval> {
    let mut raw: Vec<Interval> = Vec::with_capacity(blocks.len() + slots.len());
    raw.extend(
        blocks
            .iter()
            .map(|b| Interval::new(b.start_time, b.end_time)),
    );
    raw.extend(
        slots
            .iter()
            .map(|s| s.interval.expand(s.buffer_before, s.buffer_after)),
    );
    merge_intervals(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::busy::SOURCE_MANUAL;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
    }

    fn block(s: (u32, u32), e: (u32, u32)) -> BusyBlock {
        BusyBlock::new("host-1".into(), at(s.0, s.1), at(e.0, e.1), SOURCE_MANUAL)
    }

    #[test]
    fn slots_are_widened_by_their_buffers() {
        let slot = BufferedSlot {
            interval: Interval::new(at(10, 0), at(11, 0)),
            buffer_before: Duration::minutes(15),
            buffer_after: Duration::minutes(30),
        };
        let busy = aggregate_busy(&[], &[slot]);
        assert_eq!(busy, vec![Interval::new(at(9, 45), at(11, 30))]);
    }

    #[test]
    fn blocks_and_slots_merge_into_one_union() {
        let blocks = vec![block((9, 0), (10, 0)), block((13, 0), (14, 0))];
        let slot = BufferedSlot {
            interval: Interval::new(at(10, 0), at(10, 30)),
            buffer_before: Duration::zero(),
            buffer_after: Duration::zero(),
        };
        let busy = aggregate_busy(&blocks, &[slot]);
        assert_eq!(
            busy,
            vec![
                Interval::new(at(9, 0), at(10, 30)),
                Interval::new(at(13, 0), at(14, 0)),
            ]
        );
    }

    /// Reference measure of the union of arbitrary intervals, by boundary sweep.
    fn union_seconds(intervals: &[(i64, i64)]) -> i64 {
        let mut events: Vec<(i64, i64)> = Vec::new();
        for &(s, e) in intervals {
            if s < e {
                events.push((s, 1));
                events.push((e, -1));
            }
        }
        events.sort();
        let (mut depth, mut covered, mut opened_at) = (0i64, 0i64, 0i64);
        for (t, d) in events {
            if depth == 0 && d == 1 {
                opened_at = t;
            }
            depth += d;
            if depth == 0 {
                covered += t - opened_at;
            }
        }
        covered
    }

    proptest! {
        // Merge correctness: output sorted, pairwise disjoint and non-touching,
        // covering exactly the input union.
        #[test]
        fn merged_busy_set_is_canonical(
            raw in prop::collection::vec((0i64..86_400, 0i64..7_200), 0..40)
        ) {
            let base = at(0, 0);
            let intervals: Vec<(i64, i64)> =
                raw.iter().map(|&(s, len)| (s, s + len)).collect();
            let blocks: Vec<BusyBlock> = intervals
                .iter()
                .map(|&(s, e)| {
                    BusyBlock::new(
                        "host-1".into(),
                        base + Duration::seconds(s),
                        base + Duration::seconds(e),
                        SOURCE_MANUAL,
                    )
                })
                .collect();

            let merged = aggregate_busy(&blocks, &[]);

            for w in merged.windows(2) {
                prop_assert!(
                    w[0].end < w[1].start,
                    "intervals must be sorted with a positive gap: {:?}",
                    w
                );
            }
            for iv in &merged {
                prop_assert!(iv.start < iv.end);
            }

            let merged_total: i64 = merged
                .iter()
                .map(|iv| (iv.end - iv.start).num_seconds())
                .sum();
            prop_assert_eq!(merged_total, union_seconds(&intervals));
        }
    }
}
