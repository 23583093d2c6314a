use chrono::{DateTime, Duration, Utc};

/// Half-open UTC time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open overlap: touching intervals do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Widens the range by a buffer on each side.
    pub fn expand(&self, before: Duration, after: Duration) -> Interval {
        Interval::new(self.start - before, self.end + after)
    }

    /// Clamps the range to `bounds`. May produce an empty interval.
    pub fn clamp_to(&self, bounds: &Interval) -> Interval {
        Interval::new(self.start.max(bounds.start), self.end.min(bounds.end))
    }
}

/// Sorts and sweep-merges a set of intervals into a canonical union:
/// sorted, pairwise non-overlapping and non-touching, same covered time.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.retain(|iv| !iv.is_empty());
    intervals.sort_by_key(|iv| (iv.start, iv.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            // Touching intervals collapse as well, so the output never
            // contains two ranges sharing a boundary instant.
            Some(last) if iv.start <= last.end => {
                if iv.end > last.end {
                    last.end = iv.end;
                }
            }
            _ => merged.push(iv),
        }
    }
    merged
}

/// Intersection of two canonical (merged) interval sets.
pub fn intersect_sets(a: &[Interval], b: &[Interval]) -> Vec<Interval> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let start = a[i].start.max(b[j].start);
        let end = a[i].end.min(b[j].end);
        if start < end {
            out.push(Interval::new(start, end));
        }
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// Union of two canonical interval sets.
pub fn union_sets(a: &[Interval], b: &[Interval]) -> Vec<Interval> {
    let mut all = Vec::with_capacity(a.len() + b.len());
    all.extend_from_slice(a);
    all.extend_from_slice(b);
    merge_intervals(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
    }

    fn iv(s: (u32, u32), e: (u32, u32)) -> Interval {
        Interval::new(at(s.0, s.1), at(e.0, e.1))
    }

    #[test]
    fn overlap_is_half_open() {
        let a = iv((9, 0), (10, 0));
        let b = iv((10, 0), (11, 0));
        assert!(!a.overlaps(&b), "touching intervals must not overlap");
        assert!(a.overlaps(&iv((9, 59), (10, 30))));
    }

    #[test]
    fn merge_collapses_overlapping_and_touching() {
        let merged = merge_intervals(vec![
            iv((13, 0), (14, 0)),
            iv((9, 0), (10, 0)),
            iv((10, 0), (10, 30)),
            iv((9, 30), (9, 45)),
        ]);
        assert_eq!(merged, vec![iv((9, 0), (10, 30)), iv((13, 0), (14, 0))]);
    }

    #[test]
    fn merge_drops_empty_intervals() {
        let merged = merge_intervals(vec![iv((9, 0), (9, 0)), iv((10, 0), (9, 0))]);
        assert!(merged.is_empty());
    }

    #[test]
    fn intersect_two_sets() {
        let a = vec![iv((9, 0), (12, 0)), iv((14, 0), (17, 0))];
        let b = vec![iv((11, 0), (15, 0))];
        assert_eq!(
            intersect_sets(&a, &b),
            vec![iv((11, 0), (12, 0)), iv((14, 0), (15, 0))]
        );
    }

    #[test]
    fn union_two_sets() {
        let a = vec![iv((9, 0), (10, 0))];
        let b = vec![iv((9, 30), (11, 0)), iv((12, 0), (13, 0))];
        assert_eq!(
            union_sets(&a, &b),
            vec![iv((9, 0), (11, 0)), iv((12, 0), (13, 0))]
        );
    }

    #[test]
    fn clamp_to_bounds() {
        let bounds = iv((9, 0), (17, 0));
        assert_eq!(iv((8, 0), (10, 0)).clamp_to(&bounds), iv((9, 0), (10, 0)));
        assert!(iv((6, 0), (7, 0)).clamp_to(&bounds).is_empty());
    }
}
