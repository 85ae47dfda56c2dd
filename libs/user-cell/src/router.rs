use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_utils::extractor::require_token;
use shared_utils::state::AppState;

use crate::handlers;

pub fn user_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/admin/{email}", get(handlers::check_admin))
        .route("/user/{email}", put(handlers::upsert_user));

    let protected_routes = Router::new()
        .route("/user", get(handlers::list_users))
        .route("/user/admin/{email}", put(handlers::grant_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
