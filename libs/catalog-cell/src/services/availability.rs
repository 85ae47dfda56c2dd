use std::collections::{HashMap, HashSet};

use shared_models::booking::Booking;
use shared_models::catalog::Service;

/// Removes every slot already booked on `date` from each service.
///
/// Bookings are matched to services by `treatment == name` and to slots by
/// exact label. Service order and each service's slot order are preserved.
/// Bookings for other dates are ignored, so callers may pass a pre-filtered
/// or a full list.
pub fn compute_availability(services: Vec<Service>, bookings: &[Booking], date: &str) -> Vec<Service> {
    let booked = booked_slots_by_treatment(bookings, date);

    services
        .into_iter()
        .map(|mut service| {
            if let Some(taken) = booked.get(service.name.as_str()) {
                service.slots.retain(|slot| !taken.contains(slot.as_str()));
            }
            service
        })
        .collect()
}

fn booked_slots_by_treatment<'a>(bookings: &'a [Booking], date: &str) -> HashMap<&'a str, HashSet<&'a str>> {
    let mut booked: HashMap<&str, HashSet<&str>> = HashMap::new();

    for booking in bookings.iter().filter(|booking| booking.date == date) {
        booked
            .entry(booking.treatment.as_str())
            .or_default()
            .insert(booking.slot.as_str());
    }

    booked
}
