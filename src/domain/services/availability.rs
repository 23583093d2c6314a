use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::domain::models::availability::AvailabilityPattern;
use crate::domain::services::interval::Interval;

/// Resolved availability for one local calendar day: the UTC windows during
/// which the host is nominally available. Days without a matching pattern
/// carry an empty window list.
#[derive(Debug, Clone)]
pub struct DayWindows {
    pub date: NaiveDate,
    pub windows: Vec<Interval>,
}

/// Picks the timezone availability is resolved in: the host's configured
/// zone, else the service-wide default, else UTC.
pub fn resolve_timezone(host_timezone: Option<&str>, default_timezone: &str) -> Tz {
    host_timezone
        .and_then(|tz| tz.parse().ok())
        .or_else(|| default_timezone.parse().ok())
        .unwrap_or(chrono_tz::UTC)
}

/// Expands a host's weekly patterns into concrete UTC windows for every local
/// calendar day touched by `range`. Local "HH:MM" bounds are converted per
/// date, so the UTC offset follows DST on that specific day. Windows are
/// clamped to `range`; bounds falling into a DST gap are skipped for that day.
pub fn resolve_windows(patterns: &[AvailabilityPattern], tz: Tz, range: Interval) -> Vec<DayWindows> {
    let mut days = Vec::new();
    if range.is_empty() {
        return days;
    }

    let first_day = range.start.with_timezone(&tz).date_naive();
    let last_day = (range.end - Duration::seconds(1)).with_timezone(&tz).date_naive();

    let mut date = first_day;
    while date <= last_day {
        let dow = date.weekday().num_days_from_sunday() as i32;

        let mut windows: Vec<Interval> = Vec::new();
        for pattern in patterns.iter().filter(|p| p.day_of_week == dow) {
            match pattern_window(pattern, date, tz) {
                Some(window) => {
                    let clamped = window.clamp_to(&range);
                    if !clamped.is_empty() {
                        windows.push(clamped);
                    }
                }
                None => {
                    warn!(
                        host_id = %pattern.host_id,
                        %date,
                        "skipping availability pattern with unresolvable local time"
                    );
                }
            }
        }
        windows.sort_by_key(|w| w.start);

        days.push(DayWindows { date, windows });

        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    days
}

fn pattern_window(pattern: &AvailabilityPattern, date: NaiveDate, tz: Tz) -> Option<Interval> {
    let start = NaiveTime::parse_from_str(&pattern.start_time, "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(&pattern.end_time, "%H:%M").ok()?;
    if end <= start {
        return None;
    }

    let start_utc = local_to_utc(date, start, tz)?;
    let end_utc = local_to_utc(date, end, tz)?;
    Some(Interval::new(start_utc, end_utc))
}

fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pattern(dow: i32, start: &str, end: &str) -> AvailabilityPattern {
        AvailabilityPattern::new("host-1".into(), dow, start.into(), end.into())
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn monday_pattern_resolves_only_on_mondays() {
        // 2025-06-02 is a Monday (day_of_week 1).
        let patterns = vec![pattern(1, "09:00", "12:00")];
        let range = Interval::new(utc(2025, 6, 2, 0, 0), utc(2025, 6, 4, 0, 0));

        let days = resolve_windows(&patterns, chrono_tz::UTC, range);
        assert_eq!(days.len(), 2);
        assert_eq!(
            days[0].windows,
            vec![Interval::new(utc(2025, 6, 2, 9, 0), utc(2025, 6, 2, 12, 0))]
        );
        assert!(days[1].windows.is_empty(), "Tuesday has no pattern");
    }

    #[test]
    fn dst_shifts_utc_window_by_one_hour() {
        // New York pattern Monday 09:00-17:00. 2025-01-06 is a standard-time
        // Monday (UTC-5), 2025-07-07 a daylight-saving Monday (UTC-4). Local
        // wall-clock bounds are identical; the UTC window shifts by one hour.
        let tz: Tz = "America/New_York".parse().unwrap();
        let patterns = vec![pattern(1, "09:00", "17:00")];

        let winter = resolve_windows(
            &patterns,
            tz,
            Interval::new(utc(2025, 1, 6, 0, 0), utc(2025, 1, 8, 0, 0)),
        );
        let winter_window = winter
            .iter()
            .find(|d| !d.windows.is_empty())
            .expect("winter Monday resolved")
            .windows[0];
        assert_eq!(winter_window.start, utc(2025, 1, 6, 14, 0));
        assert_eq!(winter_window.end, utc(2025, 1, 6, 22, 0));

        let summer = resolve_windows(
            &patterns,
            tz,
            Interval::new(utc(2025, 7, 7, 0, 0), utc(2025, 7, 9, 0, 0)),
        );
        let summer_window = summer
            .iter()
            .find(|d| !d.windows.is_empty())
            .expect("summer Monday resolved")
            .windows[0];
        assert_eq!(summer_window.start, utc(2025, 7, 7, 13, 0));
        assert_eq!(summer_window.end, utc(2025, 7, 7, 21, 0));
    }

    #[test]
    fn windows_are_clamped_to_the_queried_range() {
        let patterns = vec![pattern(1, "09:00", "17:00")];
        let range = Interval::new(utc(2025, 6, 2, 10, 0), utc(2025, 6, 2, 11, 0));

        let days = resolve_windows(&patterns, chrono_tz::UTC, range);
        assert_eq!(days.len(), 1);
        assert_eq!(
            days[0].windows,
            vec![Interval::new(utc(2025, 6, 2, 10, 0), utc(2025, 6, 2, 11, 0))]
        );
    }

    #[test]
    fn inverted_pattern_bounds_are_ignored() {
        let patterns = vec![pattern(1, "17:00", "09:00")];
        let range = Interval::new(utc(2025, 6, 2, 0, 0), utc(2025, 6, 3, 0, 0));

        let days = resolve_windows(&patterns, chrono_tz::UTC, range);
        assert!(days[0].windows.is_empty());
    }

    #[test]
    fn timezone_fallback_chain() {
        assert_eq!(
            resolve_timezone(Some("Europe/Berlin"), "America/New_York"),
            "Europe/Berlin".parse::<Tz>().unwrap()
        );
        assert_eq!(
            resolve_timezone(None, "America/New_York"),
            "America/New_York".parse::<Tz>().unwrap()
        );
        assert_eq!(resolve_timezone(Some("Not/AZone"), "Also/Broken"), chrono_tz::UTC);
    }
}
