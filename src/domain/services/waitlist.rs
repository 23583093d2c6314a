use crate::domain::models::booking::Booking;

/// A waitlist position rewrite for one booking row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionChange {
    pub booking_id: String,
    pub position: i32,
}

/// The promotee on cancellation of a confirmed seat: the live waitlisted
/// booking with the lowest position.
pub fn next_in_line(waitlisted: &[Booking]) -> Option<&Booking> {
    waitlisted
        .iter()
        .filter(|b| !b.is_cancelled() && b.is_waitlisted)
        .min_by_key(|b| b.waitlist_position.unwrap_or(i32::MAX))
}

/// Renumbers the remaining waitlist to a contiguous 1..M sequence, keeping
/// the current relative order. Input must be ordered by position ascending;
/// only rows whose position actually changes are returned, so the write-back
/// is idempotent.
pub fn renumber(waitlisted: &[Booking]) -> Vec<PositionChange> {
    waitlisted
        .iter()
        .enumerate()
        .filter_map(|(idx, booking)| {
            let target = idx as i32 + 1;
            if booking.waitlist_position == Some(target) {
                None
            } else {
                Some(PositionChange {
                    booking_id: booking.id.clone(),
                    position: target,
                })
            }
        })
        .collect()
}
