use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use shared_database::DocumentStore;
use shared_models::booking::{Admission, Booking};

pub struct BookingAdmission {
    store: Arc<dyn DocumentStore>,
}

impl BookingAdmission {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Stores `booking` unless the patient already holds one for the same
    /// treatment on the same date, in which case that booking is returned.
    pub async fn try_create(&self, booking: Booking) -> Result<Admission> {
        debug!(
            "Admitting booking for {} ({} on {})",
            booking.patient, booking.treatment, booking.date
        );

        let admission = self.store.insert_booking_unless_exists(booking).await?;

        match &admission {
            Admission::Admitted(stored) => info!(
                "Booked {} at {} on {} for {}",
                stored.treatment, stored.slot, stored.date, stored.patient
            ),
            Admission::Existing(existing) => info!(
                "Refused duplicate {} booking on {} for {}",
                existing.treatment, existing.date, existing.patient
            ),
        }

        Ok(admission)
    }

    pub async fn bookings_for(&self, patient: &str) -> Result<Vec<Booking>> {
        self.store.find_bookings_for(patient).await
    }
}
