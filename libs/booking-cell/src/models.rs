use serde::{Deserialize, Serialize};

use shared_models::booking::{Admission, Booking};

#[derive(Debug, Deserialize)]
pub struct PatientQuery {
    pub patient: Option<String>,
}

/// Body of `POST /booking`. A refused booking echoes the one already on file.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateBookingResponse {
    Created { success: bool, result: Booking },
    Duplicate { success: bool, booking: Booking },
}

impl From<Admission> for CreateBookingResponse {
    fn from(admission: Admission) -> Self {
        match admission {
            Admission::Admitted(result) => Self::Created { success: true, result },
            Admission::Existing(booking) => Self::Duplicate { success: false, booking },
        }
    }
}
