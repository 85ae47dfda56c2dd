use std::sync::Arc;

use axum::{routing::get, Router};

use shared_utils::state::AppState;

use crate::handlers;

pub fn catalog_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/service", get(handlers::list_services))
        .route("/available", get(handlers::available_slots))
        .with_state(state)
}
