use crate::domain::models::{booking::Booking, event::Event, slot::Slot};
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

/// Generates an iCalendar (.ics) string for a booked slot
pub fn generate_ics(event: &Event, slot: &Slot, booking: &Booking) -> String {
    let mut calendar = Calendar::new();

    let ical_event = IcalEvent::new()
        .summary(&event.title)
        .description(&event.description)
        .location(&event.location)
        .starts(slot.start_time)
        .ends(slot.end_time)
        .uid(&booking.id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
