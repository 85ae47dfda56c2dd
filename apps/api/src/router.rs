use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use booking_cell::router::booking_routes;
use catalog_cell::router::catalog_routes;
use shared_utils::state::AppState;
use user_cell::router::user_routes;

pub const GREETING: &str = "Hello From Doctors Portal";

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { GREETING }))
        .merge(catalog_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(booking_routes(state))
}
