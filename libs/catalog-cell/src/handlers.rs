use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use shared_models::catalog::Service;
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::AvailabilityQuery;
use crate::services::CatalogService;

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    let service = CatalogService::new(state.store.clone());

    let services = service.list_services().await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(services))
}

#[axum::debug_handler]
pub async fn available_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<Service>>, AppError> {
    let date = query
        .date
        .filter(|date| !date.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Query parameter `date` is required".to_string()))?;

    let service = CatalogService::new(state.store.clone());

    let available = service.available_on(&date).await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(available))
}
