use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_utils::extractor::require_token;
use shared_utils::state::AppState;

use crate::handlers;

pub fn booking_routes(state: Arc<AppState>) -> Router {
    // Only listing requires a token; creating a booking is public.
    Router::new()
        .route(
            "/booking",
            get(handlers::list_patient_bookings)
                .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
                .post(handlers::create_booking),
        )
        .with_state(state)
}
