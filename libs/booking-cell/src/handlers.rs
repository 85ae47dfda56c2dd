use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use tracing::warn;

use shared_models::auth::TokenClaims;
use shared_models::booking::Booking;
use shared_models::error::AppError;
use shared_utils::extractor::FORBIDDEN_ACCESS;
use shared_utils::state::AppState;

use crate::models::{CreateBookingResponse, PatientQuery};
use crate::services::BookingAdmission;

/// Bookings of the patient named in the query, who must be the token holder.
#[axum::debug_handler]
pub async fn list_patient_bookings(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<TokenClaims>,
    Query(query): Query<PatientQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let patient = match query.patient {
        Some(patient) if patient == claims.email => patient,
        requested => {
            warn!("{} asked for bookings of {:?}", claims.email, requested);
            return Err(AppError::Forbidden(FORBIDDEN_ACCESS.to_string()));
        }
    };

    let admission = BookingAdmission::new(state.store.clone());

    let bookings = admission.bookings_for(&patient).await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(booking): Json<Booking>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    let admission = BookingAdmission::new(state.store.clone());

    let outcome = admission.try_create(booking).await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(outcome.into()))
}
