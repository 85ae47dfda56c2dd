use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub treatment: String,
    pub date: String,
    pub patient: String,
    pub slot: String,
    #[serde(rename = "patientName", default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Booking {
    pub fn new(
        treatment: impl Into<String>,
        date: impl Into<String>,
        patient: impl Into<String>,
        slot: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            treatment: treatment.into(),
            date: date.into(),
            patient: patient.into(),
            slot: slot.into(),
            patient_name: None,
            phone: None,
        }
    }

    pub fn key(&self) -> BookingKey<'_> {
        BookingKey {
            treatment: &self.treatment,
            date: &self.date,
            patient: &self.patient,
        }
    }
}

/// Duplicate-detection key. The slot is deliberately not part of it: a patient
/// holds at most one booking per treatment per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookingKey<'a> {
    pub treatment: &'a str,
    pub date: &'a str,
    pub patient: &'a str,
}

impl BookingKey<'_> {
    pub fn matches(&self, booking: &Booking) -> bool {
        booking.key() == *self
    }
}

/// Outcome of a conditional insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admitted(Booking),
    Existing(Booking),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted(_))
    }

    pub fn booking(&self) -> &Booking {
        match self {
            Admission::Admitted(booking) | Admission::Existing(booking) => booking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_ignores_slot() {
        let morning = Booking::new("Teeth Cleaning", "Oct 19, 2026", "a@x.com", "08.00 AM - 08.30 AM");
        let evening = Booking::new("Teeth Cleaning", "Oct 19, 2026", "a@x.com", "05.00 PM - 05.30 PM");

        assert_eq!(morning.key(), evening.key());
        assert!(morning.key().matches(&evening));
    }

    #[test]
    fn test_key_distinguishes_patient() {
        let first = Booking::new("Teeth Cleaning", "Oct 19, 2026", "a@x.com", "9am");
        let second = Booking::new("Teeth Cleaning", "Oct 19, 2026", "b@x.com", "9am");

        assert!(!first.key().matches(&second));
    }

    #[test]
    fn test_client_payload_field_names() {
        let booking: Booking = serde_json::from_value(json!({
            "treatment": "Fluoride Treatment",
            "date": "Oct 19, 2026",
            "slot": "10am",
            "patient": "a@x.com",
            "patientName": "Ada",
            "phone": "555-0100"
        }))
        .unwrap();

        assert_eq!(booking.patient_name.as_deref(), Some("Ada"));
        assert_eq!(booking.id, None);

        let value = serde_json::to_value(&booking).unwrap();
        assert_eq!(value["patientName"], "Ada");
        assert!(value.get("_id").is_none());
    }
}
